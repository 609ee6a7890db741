// Per-site forecasting rules
use super::parameter::Parameter;

/// How the next value of one parameter is forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastRule {
    /// `slope * n + intercept`, where `n` is the number of historical rows.
    LinearRegression { slope: f64, intercept: f64 },
    /// The latest observed value.
    RepeatLast,
}

/// The forecasting rules for one site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteModel {
    /// Clean site id, as used by the history store.
    pub site_id: String,
    rules: [Option<ForecastRule>; Parameter::COUNT],
}

impl SiteModel {
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            rules: [None; Parameter::COUNT],
        }
    }

    pub fn with_rule(mut self, parameter: Parameter, rule: ForecastRule) -> Self {
        self.rules[parameter.index()] = Some(rule);
        self
    }

    pub fn rule(&self, parameter: Parameter) -> Option<ForecastRule> {
        self.rules[parameter.index()]
    }
}

/// Strips surrounding whitespace and every quote character.
///
/// Historic model files key sites as ` "ABC123` (leading space and quote);
/// callers send `ABC123`, `"ABC123"` or ` ABC123 `. All of these clean to
/// `ABC123`.
pub fn normalize_site_id(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lookup key for a site: the cleaned id, case-folded.
pub fn site_key(raw: &str) -> String {
    normalize_site_id(raw).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_site_id() {
        assert_eq!(normalize_site_id(" \"233217"), "233217");
        assert_eq!(normalize_site_id("\"233217\""), "233217");
        assert_eq!(normalize_site_id("  233217 "), "233217");
        assert_eq!(normalize_site_id("'site_001'"), "site_001");
    }

    #[test]
    fn test_site_key_ignores_formatting_and_case() {
        assert_eq!(site_key(" \"Site_001"), site_key("site_001"));
        assert_eq!(site_key("SITE_001 "), "site_001");
    }

    #[test]
    fn test_missing_rule_is_none() {
        let model = SiteModel::new("site_001").with_rule(Parameter::Ph, ForecastRule::RepeatLast);
        assert_eq!(model.rule(Parameter::Ph), Some(ForecastRule::RepeatLast));
        assert_eq!(model.rule(Parameter::Sodium), None);
    }
}
