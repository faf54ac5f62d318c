//! Per-view request parameters and their HTTP mapping.

use crate::types::ViewKind;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Theoretical distribution family fitted to a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionFamily {
    #[default]
    Norm,
    Lognorm,
    Gamma,
}

impl DistributionFamily {
    /// Tag understood by the analytics service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Norm => "norm",
            Self::Lognorm => "lognorm",
            Self::Gamma => "gamma",
        }
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters selected by the user for one view.
///
/// A changed `ViewRequest` is what moves a view back into `Loading`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewRequest {
    Summary,
    Distribution {
        column: String,
        #[serde(default)]
        family: DistributionFamily,
    },
    Correlation,
    Association,
    BoxPlot {
        group_column: String,
        value_column: String,
    },
    Pca {
        columns: Vec<String>,
    },
    TTest {
        group_column: String,
        value_column: String,
    },
    Gini,
    MonteCarlo {
        #[serde(default)]
        simulations: Option<u32>,
    },
    Regression {
        target: String,
        predictors: Vec<String>,
        #[serde(default = "default_model_type")]
        model_type: String,
    },
}

fn default_model_type() -> String {
    "OLS".to_string()
}

/// HTTP verb used for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Where and how a request is sent, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: Method,
    /// Path relative to the service base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl Endpoint {
    fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }
}

impl ViewRequest {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Summary => ViewKind::Summary,
            Self::Distribution { .. } => ViewKind::Distribution,
            Self::Correlation => ViewKind::Correlation,
            Self::Association => ViewKind::Association,
            Self::BoxPlot { .. } => ViewKind::BoxPlot,
            Self::Pca { .. } => ViewKind::Pca,
            Self::TTest { .. } => ViewKind::TTest,
            Self::Gini => ViewKind::Gini,
            Self::MonteCarlo { .. } => ViewKind::MonteCarlo,
            Self::Regression { .. } => ViewKind::Regression,
        }
    }

    /// Map the request onto the analytics service's routes.
    ///
    /// `default_simulations` fills in a Monte Carlo request that names no count.
    pub fn endpoint(&self, default_simulations: u32) -> Endpoint {
        match self {
            Self::Summary => Endpoint::get("/summary"),
            Self::Distribution { column, family } => {
                Endpoint::get(format!("/eda/dist/{}", encode_path_segment(column)))
                    .with_query("dist_type", family.as_str())
            }
            Self::Correlation => Endpoint::post("/bivariate/correlation", None),
            Self::Association => Endpoint::post("/bivariate/cramers", None),
            Self::BoxPlot {
                group_column,
                value_column,
            } => Endpoint::post(
                "/bivariate/boxplot",
                Some(json!({ "x_col": group_column, "y_col": value_column })),
            ),
            Self::Pca { columns } => {
                Endpoint::post("/multivariate/pca", Some(json!({ "cols": columns })))
            }
            Self::TTest {
                group_column,
                value_column,
            } => Endpoint::post(
                "/inference/ttest",
                Some(json!({ "group_col": group_column, "value_col": value_column })),
            ),
            Self::Gini => Endpoint::get("/metrics/inequality"),
            Self::MonteCarlo { simulations } => Endpoint::get("/metrics/monte_carlo")
                .with_query("n_sim", simulations.unwrap_or(default_simulations).to_string()),
            Self::Regression {
                target,
                predictors,
                model_type,
            } => Endpoint::post(
                "/models/regression",
                Some(json!({
                    "target": target,
                    "predictors": predictors,
                    "model_type": model_type,
                })),
            ),
        }
    }
}

/// Percent-encode a column name for use as one path segment.
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_distribution_endpoint() {
        let request = ViewRequest::Distribution {
            column: "Avg_Daily_Usage_Hours".to_string(),
            family: DistributionFamily::Gamma,
        };
        let endpoint = request.endpoint(1000);
        assert_eq!(endpoint.method, Method::Get);
        assert_eq!(endpoint.path, "/eda/dist/Avg_Daily_Usage_Hours");
        assert_eq!(endpoint.query, vec![("dist_type", "gamma".to_string())]);
        assert!(endpoint.body.is_none());
    }

    #[test]
    fn test_column_names_are_encoded() {
        let request = ViewRequest::Distribution {
            column: "Sleep Hours/Night".to_string(),
            family: DistributionFamily::Norm,
        };
        assert_eq!(request.endpoint(1000).path, "/eda/dist/Sleep%20Hours%2FNight");
    }

    #[test]
    fn test_box_plot_body() {
        let request = ViewRequest::BoxPlot {
            group_column: "Gender".to_string(),
            value_column: "Addicted_Score".to_string(),
        };
        let endpoint = request.endpoint(1000);
        assert_eq!(endpoint.method, Method::Post);
        assert_eq!(
            endpoint.body,
            Some(json!({ "x_col": "Gender", "y_col": "Addicted_Score" }))
        );
    }

    #[test]
    fn test_monte_carlo_uses_default_count() {
        let endpoint = ViewRequest::MonteCarlo { simulations: None }.endpoint(250);
        assert_eq!(endpoint.query, vec![("n_sim", "250".to_string())]);

        let endpoint = ViewRequest::MonteCarlo {
            simulations: Some(5000),
        }
        .endpoint(250);
        assert_eq!(endpoint.query, vec![("n_sim", "5000".to_string())]);
    }

    #[test]
    fn test_regression_defaults_to_ols() {
        let request: ViewRequest = serde_json::from_value(json!({
            "view": "regression",
            "target": "Addicted_Score",
            "predictors": ["Avg_Daily_Usage_Hours"]
        }))
        .unwrap();
        let body = request.endpoint(1000).body.unwrap();
        assert_eq!(body["model_type"], "OLS");
        assert_eq!(request.kind(), ViewKind::Regression);
    }

    #[test]
    fn test_kinds_cover_every_view() {
        let requests = vec![
            ViewRequest::Summary,
            ViewRequest::Distribution {
                column: "Age".into(),
                family: DistributionFamily::Norm,
            },
            ViewRequest::Correlation,
            ViewRequest::Association,
            ViewRequest::BoxPlot {
                group_column: "Gender".into(),
                value_column: "Age".into(),
            },
            ViewRequest::Pca { columns: vec![] },
            ViewRequest::TTest {
                group_column: "Gender".into(),
                value_column: "Age".into(),
            },
            ViewRequest::Gini,
            ViewRequest::MonteCarlo { simulations: None },
            ViewRequest::Regression {
                target: "y".into(),
                predictors: vec![],
                model_type: "OLS".into(),
            },
        ];
        let kinds: Vec<ViewKind> = requests.iter().map(ViewRequest::kind).collect();
        assert_eq!(kinds, ViewKind::ALL.to_vec());
    }
}
