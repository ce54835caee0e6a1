use std::borrow::Cow;

/// Per-binder configuration.
///
/// ```
/// use tincan_connect::BindOptions;
///
/// let options = BindOptions::new().display_name("CounterPanel");
/// assert_eq!(options.display_name.as_deref(), Some("CounterPanel"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BindOptions {
    /// Replaces the derived `withStore(<view>)` name.
    pub display_name: Option<Cow<'static, str>>,
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The configured name, or `withStore(<view>)`.
    pub(crate) fn resolve_name(&self, view: &str) -> Cow<'static, str> {
        match &self.display_name {
            Some(name) => name.clone(),
            None => Cow::Owned(format!("withStore({view})")),
        }
    }
}
