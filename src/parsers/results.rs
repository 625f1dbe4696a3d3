//! # 结果 JSON 读写
//!
//! 引擎结果以 JSON 保存，`report` / `export` / `plot` 命令可离线读取。
//!
//! Python 引擎用 `json.dumps` 输出时会写出裸的 `NaN` / `Infinity`，
//! 解析前先改写为字符串形式，由 `Scalar` 还原为非有限数。

use crate::error::{PlumeError, Result};
use crate::models::RunOutput;

use std::borrow::Cow;
use std::fs;
use std::path::Path;

const NON_FINITE_TOKENS: [(&str, &str); 3] = [
    ("-Infinity", "\"-inf\""),
    ("Infinity", "\"inf\""),
    ("NaN", "\"nan\""),
];

fn non_finite_token(rest: &str) -> Option<(&'static str, &'static str)> {
    NON_FINITE_TOKENS
        .into_iter()
        .find(|&(token, _)| rest.starts_with(token))
}

/// 把字符串之外的 `NaN` / `Infinity` / `-Infinity` 改写为 `"nan"` / `"inf"` / `"-inf"`
fn quote_non_finite(content: &str) -> Cow<'_, str> {
    if !content.contains("NaN") && !content.contains("Infinity") {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = content;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some((token, quoted)) = non_finite_token(rest) {
            out.push_str(quoted);
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

/// 读取结果 JSON
pub fn load_result(path: &Path) -> Result<RunOutput> {
    if !path.is_file() {
        return Err(PlumeError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| PlumeError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_result_content(&content, &path.display().to_string())
}

/// 从字符串解析结果
pub fn parse_result_content(content: &str, source: &str) -> Result<RunOutput> {
    serde_json::from_str(&quote_non_finite(content)).map_err(|e| PlumeError::ParseError {
        format: "result JSON".to_string(),
        path: source.to_string(),
        reason: e.to_string(),
    })
}

/// 保存结果 JSON（带缩进）
pub fn save_result(output: &RunOutput, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(output)?;
    fs::write(path, content).map_err(|e| PlumeError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::results::{PlumeSection, PlumeStep};
    use crate::report::render_report;
    use crate::models::{ColumnHeader, Scalar, UnitClass};

    #[test]
    fn test_parse_engine_output() {
        let json = r#"{
            "success": true,
            "cases": 1,
            "casetime": [0.0],
            "plume": {
                "headers": [
                    {"name": "depth", "label": "Depth", "units": "Length", "units_label": "m"}
                ],
                "outputs": [[{"step": 0, "values": [49.0], "status": ""}]],
                "memos": [["Froude No: 9.620;"]],
                "postmemos": [[]]
            },
            "farfield": {"was_run": false},
            "graphs": {"trajectory": {"coords": [[0.0, 49.0], [1.0, 48.5]]}}
        }"#;

        let output = parse_result_content(json, "inline").unwrap();
        assert_eq!(output.plume.headers[0].units, UnitClass::Length);
        assert_eq!(output.plume.outputs[0][0].values, vec![Scalar::Number(49.0)]);
        assert!(!output.farfield.was_run);
        assert!(output.timeseries.is_none());
        assert_eq!(output.graphs["trajectory"].coords.len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let output = RunOutput {
            success: true,
            cases: 1,
            casetime: vec![0.0],
            plume: PlumeSection {
                headers: vec![ColumnHeader::new("dilution", "Dilution", UnitClass::Unitless, "")],
                outputs: vec![vec![PlumeStep {
                    step: 12,
                    values: vec![Scalar::Number(3.5)],
                    status: "merging".to_string(),
                }]],
                ..Default::default()
            },
            ..Default::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        save_result(&output, &path).unwrap();
        assert_eq!(load_result(&path).unwrap(), output);
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_result_content("{not json", "bad.json").unwrap_err();
        assert!(matches!(err, PlumeError::ParseError { ref path, .. } if path == "bad.json"));
    }

    #[test]
    fn test_quote_non_finite_skips_strings() {
        let quoted = quote_non_finite(r#"{"status": "NaN \"Infinity\"", "values": [NaN, -Infinity, 1.0]}"#);
        assert_eq!(
            quoted,
            r#"{"status": "NaN \"Infinity\"", "values": ["nan", "-inf", 1.0]}"#
        );
        assert!(matches!(quote_non_finite("[1, 2]"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_python_non_finite_tokens() {
        let json = r#"{
            "success": true,
            "cases": 1,
            "casetime": [0.0],
            "plume": {
                "headers": [{"name": "dilution", "label": "Dilution", "units": "Unitless"}],
                "outputs": [[{"step": 3, "values": [NaN], "status": "x"}]]
            },
            "graphs": {"dilution": {"coords": [[0.0, Infinity]]}}
        }"#;

        let output = parse_result_content(json, "engine").unwrap();
        assert!(matches!(output.plume.outputs[0][0].values[0], Scalar::Number(x) if x.is_nan()));
        assert_eq!(output.graphs["dilution"].coords[0][1], f64::INFINITY);
    }

    #[test]
    fn test_non_finite_report_survives_save_and_load() {
        let output = RunOutput {
            success: true,
            cases: 1,
            casetime: vec![0.0],
            plume: PlumeSection {
                headers: vec![ColumnHeader::new("dilution", "Dilution", UnitClass::Unitless, "")],
                outputs: vec![vec![PlumeStep {
                    step: 3,
                    values: vec![Scalar::Number(f64::NAN)],
                    status: "x".to_string(),
                }]],
                ..Default::default()
            },
            ..Default::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        save_result(&output, &path).unwrap();
        let loaded = load_result(&path).unwrap();

        let direct = render_report(&output);
        assert!(direct.contains("nan"));
        assert_eq!(render_report(&loaded), direct);
    }
}
