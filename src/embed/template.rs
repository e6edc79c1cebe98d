//! Templates with `__NAME__` placeholders.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([A-Z][A-Z0-9_]*?)__").unwrap());

/// Values for a template's placeholders.
pub trait TemplateVars {
    /// Value for `__NAME__`, or `None` to leave the placeholder untouched.
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// A compiled-in template.
///
/// Substitution is a single pass over the template text, so values that
/// happen to contain `__NAME__` are never expanded again.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    content: &'static str,
}

impl Template {
    pub const fn new(content: &'static str) -> Self {
        Self { content }
    }

    pub fn render(&self, vars: &impl TemplateVars) -> String {
        PLACEHOLDER
            .replace_all(self.content, |caps: &Captures| match vars.lookup(&caps[1]) {
                Some(value) => value.into_owned(),
                None => caps[0].to_owned(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Vars(&'static str);

    impl TemplateVars for Vars {
        fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
            (name == "BODY").then_some(Cow::Borrowed(self.0))
        }
    }

    #[test]
    fn test_render_substitutes_once() {
        let tpl = Template::new("<p>__BODY__</p>__OTHER__");
        assert_eq!(tpl.render(&Vars("x")), "<p>x</p>__OTHER__");
        assert_eq!(tpl.render(&Vars("__BODY__")), "<p>__BODY__</p>__OTHER__");
    }

    #[test]
    fn test_underscored_names() {
        struct Modified;
        impl TemplateVars for Modified {
            fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
                (name == "LAST_MODIFIED").then_some(Cow::Borrowed("today"))
            }
        }
        let tpl = Template::new("[__LAST_MODIFIED__]");
        assert_eq!(tpl.render(&Modified), "[today]");
    }
}
