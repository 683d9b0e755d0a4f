use crate::document::Document;
use crate::node::Header;
use crate::slug::slug;

const BANNER: &str = "Table of Contents\n=================\n";

impl Document {
    /// A table of contents with one bullet per header, in document order,
    /// linking to the slug of each title.
    pub fn toc(&self) -> String {
        self.render_toc(|header| slug(header.title()))
    }

    /// Like [`Document::toc`], but links to a header's id when it has one.
    pub fn anchored_toc(&self) -> String {
        self.render_toc(|header| match header.id() {
            Some(id) => id.to_string(),
            None => slug(header.title()),
        })
    }

    fn render_toc(&self, anchor: impl Fn(&Header) -> String) -> String {
        let mut toc = String::from(BANNER);
        for header in self.headers() {
            let indent = "   ".repeat(header.level());
            toc.push_str(&format!(
                "{}* [{}](#{})\n",
                indent,
                header.title(),
                anchor(header)
            ));
        }
        toc
    }
}
