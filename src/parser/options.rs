//! Configuration for the parser and renderer.

#[cfg(feature = "bon")]
use bon::Builder;

#[derive(Default, Debug, Clone)]
/// Umbrella options struct.
pub struct Options {
    /// Configure parse-time options.
    pub parse: Parse,

    /// Configure render-time options.
    pub render: Render,
}

#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Options for parser functions.
pub struct Parse {
    /// Which blocks can see a reference definition.
    ///
    /// ```rust
    /// # use md2txt::{markdown_to_text, Options, ReferenceScope};
    /// let md = "[home]: /index \"Home\"\n\nGo [back][home].\n";
    ///
    /// let options = Options::default();
    /// assert_eq!(markdown_to_text(md, &options), "\nGo backHome/index.");
    ///
    /// let mut options = Options::default();
    /// options.parse.reference_scope = ReferenceScope::Block;
    /// assert_eq!(markdown_to_text(md, &options), "\nGo back.");
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub reference_scope: ReferenceScope,
}

/// Lifetime of the reference table built from `[id]: url` definitions.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceScope {
    /// One table for the whole document.  A definition is visible to every
    /// block rendered after the one it appears in.
    #[default]
    Document,

    /// Each block gets a fresh table; definitions only resolve links within
    /// the same block.
    Block,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Options for formatter functions.
pub struct Render {
    /// Text placed between top-level blocks.
    ///
    /// ```rust
    /// # use md2txt::{markdown_to_text, Options};
    /// let mut options = Options::default();
    /// options.render.block_separator = "\n\n".to_string();
    /// assert_eq!(markdown_to_text("# Title\nBody text.\n", &options),
    ///            "Title\n\nBody text.");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = "\n".to_string()))]
    pub block_separator: String,
}

impl Default for Render {
    fn default() -> Self {
        Render {
            block_separator: "\n".to_string(),
        }
    }
}
