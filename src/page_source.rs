use std::time::Duration;

use serde_json::Value;

use crate::PageError;

pub(crate) const DEFAULT_PAGE_FIELD: &str = "page";
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Supplies the furthest page reached. Implementations only ever hand back
/// non-negative pages.
pub(crate) trait PageSource {
    fn current_page(&self) -> Result<i64, PageError>;
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedPage(pub(crate) i64);

impl PageSource for FixedPage {
    fn current_page(&self) -> Result<i64, PageError> {
        if self.0 < 0 {
            return Err(PageError::Invalid(self.0.to_string()));
        }
        Ok(self.0)
    }

    fn describe(&self) -> String {
        "fixed".to_string()
    }
}

/// Reads the page from a JSON document served at `url`, e.g. a raw gist
/// holding `{"page": 4130}`.
#[derive(Debug, Clone)]
pub(crate) struct RemotePage {
    pub(crate) url: String,
    pub(crate) field: String,
    pub(crate) timeout: Duration,
}

impl RemotePage {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            field: DEFAULT_PAGE_FIELD.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub(crate) fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn fetch(&self) -> Result<Value, PageError> {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(self.timeout)
            .timeout_read(self.timeout)
            .build();
        match agent.get(&self.url).set("accept", "application/json").call() {
            Ok(resp) => resp
                .into_json::<Value>()
                .map_err(|e| PageError::Json(e.to_string())),
            Err(ureq::Error::Status(code, _)) => Err(PageError::Status(code)),
            Err(err) => Err(PageError::Transport(err.to_string())),
        }
    }
}

impl PageSource for RemotePage {
    fn current_page(&self) -> Result<i64, PageError> {
        tracing::debug!(url = %self.url, field = %self.field, "fetching current page");
        let document = self.fetch()?;
        let page = page_from_document(&document, &self.field)?;
        tracing::debug!(page, "fetched current page");
        Ok(page)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Parses a page given as text, e.g. a query parameter or a CLI argument.
pub(crate) fn parse_page(raw: &str) -> Result<i64, PageError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PageError::Missing);
    }
    match trimmed.parse::<i64>() {
        Ok(page) if page >= 0 => Ok(page),
        _ => Err(PageError::Invalid(trimmed.to_string())),
    }
}

/// Pulls `field` out of a page document. Accepts an integer, a float with
/// no fractional part, or a string holding an integer.
pub(crate) fn page_from_document(document: &Value, field: &str) -> Result<i64, PageError> {
    let value = document
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| PageError::MissingField(field.to_string()))?;
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_page))
            .filter(|&page| page >= 0)
            .ok_or_else(|| PageError::Invalid(n.to_string())),
        Value::String(s) => parse_page(s).map_err(|_| PageError::Invalid(s.clone())),
        other => Err(PageError::Invalid(other.to_string())),
    }
}

fn integral_page(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value < i64::MAX as f64)
        .then_some(value as i64)
}
