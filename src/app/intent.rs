use crate::domain::app_settings::Section;
use crate::domain::filter::FilterField;
use crate::domain::user::{AuthProvider, SessionUser};
use crate::services::error_handling::CatalogError;
use crate::services::export_service::ExportFormat;
use std::path::PathBuf;
use std::str::FromStr;

/// Keypad actions for the calculator panel.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcAction {
    Append(String),
    DeleteLast,
    Clear,
    Evaluate,
}

/// Typed intents emitted by the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Navigate(Section),
    Search(String),
    SetFilter(FilterField),
    FilterByCategory(String),
    ClearFilters,
    GoToPage(usize),
    PreviousPage,
    NextPage,
    ShowProduct(String),
    CloseProduct,
    ToggleBookmark(String),
    Login(SessionUser),
    LoginAdmin { id: String, password: String },
    LoginWithProvider(AuthProvider),
    Logout,
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    ToggleTheme,
    Calc(CalcAction),
    Calculate(String),
    ChainSpeed { pitch: String, teeth: String, rpm: String },
}

fn invalid(reason: impl Into<String>) -> CatalogError {
    CatalogError::Validation {
        field: "command".to_string(),
        reason: reason.into(),
    }
}

fn optional_value(rest: &[&str]) -> Option<String> {
    let value = rest.join(" ");
    if value.trim().is_empty() { None } else { Some(value) }
}

fn parse_filter(rest: &[&str]) -> Result<FilterField, CatalogError> {
    let (field, value) = rest
        .split_first()
        .ok_or_else(|| invalid("usage: filter <category|series|pitch|material> [value]"))?;

    match field.to_lowercase().as_str() {
        "category" => Ok(FilterField::Category(optional_value(value))),
        "series" => Ok(FilterField::Series(optional_value(value))),
        "material" => Ok(FilterField::Material(optional_value(value))),
        "pitch" => match optional_value(value) {
            None => Ok(FilterField::Pitch(None)),
            Some(raw) => raw
                .trim()
                .trim_end_matches("mm")
                .parse::<f64>()
                .map(|p| FilterField::Pitch(Some(p)))
                .map_err(|_| invalid(format!("pitch must be a number, got '{}'", raw))),
        },
        other => Err(invalid(format!("unknown filter field '{}'", other))),
    }
}

/// Parses one console line, e.g. `search rs40`, `filter pitch 12.7`, `page 3`.
impl FromStr for Command {
    type Err = CatalogError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (verb, rest) = parts.split_first().ok_or_else(|| invalid("empty command"))?;

        let command = match verb.to_lowercase().as_str() {
            "nav" | "go" => {
                let section = rest.first().ok_or_else(|| invalid("usage: nav <section>"))?;
                Command::Navigate(section.parse().map_err(invalid)?)
            }
            "search" => Command::Search(rest.join(" ")),
            "filter" => Command::SetFilter(parse_filter(rest)?),
            "category" => Command::FilterByCategory(
                optional_value(rest).ok_or_else(|| invalid("usage: category <name>"))?,
            ),
            "clear" => Command::ClearFilters,
            "page" => {
                let raw = rest.first().ok_or_else(|| invalid("usage: page <n>"))?;
                Command::GoToPage(
                    raw.parse()
                        .map_err(|_| invalid(format!("page must be a number, got '{}'", raw)))?,
                )
            }
            "prev" => Command::PreviousPage,
            "next" => Command::NextPage,
            "show" => Command::ShowProduct(
                rest.first().ok_or_else(|| invalid("usage: show <id>"))?.to_string(),
            ),
            "close" => Command::CloseProduct,
            "bookmark" => Command::ToggleBookmark(
                rest.first().ok_or_else(|| invalid("usage: bookmark <id>"))?.to_string(),
            ),
            "login" => match rest {
                ["admin", id, password] => Command::LoginAdmin {
                    id: id.to_string(),
                    password: password.to_string(),
                },
                ["google"] => Command::LoginWithProvider(AuthProvider::Google),
                ["kakao"] => Command::LoginWithProvider(AuthProvider::Kakao),
                _ => {
                    return Err(invalid(
                        "usage: login admin <id> <password> | login google | login kakao",
                    ));
                }
            },
            "logout" => Command::Logout,
            "export" => {
                let (format, rest) = match rest.split_first() {
                    Some((first, tail)) if first.eq_ignore_ascii_case("json") => {
                        (ExportFormat::Json, tail)
                    }
                    Some((first, tail)) if first.eq_ignore_ascii_case("csv") => {
                        (ExportFormat::Csv, tail)
                    }
                    _ => (ExportFormat::Csv, rest),
                };
                Command::Export {
                    format,
                    path: rest.first().map(PathBuf::from),
                }
            }
            "theme" => Command::ToggleTheme,
            "calc" => Command::Calculate(rest.join(" ")),
            "speed" => match rest {
                [pitch, teeth, rpm] => Command::ChainSpeed {
                    pitch: pitch.to_string(),
                    teeth: teeth.to_string(),
                    rpm: rpm.to_string(),
                },
                _ => return Err(invalid("usage: speed <pitch_mm> <teeth> <rpm>")),
            },
            other => return Err(invalid(format!("unknown command '{}'", other))),
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("search rs 40", Command::Search("rs 40".to_string()))]
    #[case("nav products", Command::Navigate(Section::Products))]
    #[case("category Drive Chain", Command::FilterByCategory("Drive Chain".to_string()))]
    #[case("filter pitch 12.7mm", Command::SetFilter(FilterField::Pitch(Some(12.7))))]
    #[case("filter series", Command::SetFilter(FilterField::Series(None)))]
    #[case(
        "filter material Stainless Steel",
        Command::SetFilter(FilterField::Material(Some("Stainless Steel".to_string())))
    )]
    #[case("page 3", Command::GoToPage(3))]
    #[case("next", Command::NextPage)]
    #[case("bookmark TSK_0001", Command::ToggleBookmark("TSK_0001".to_string()))]
    #[case("login kakao", Command::LoginWithProvider(AuthProvider::Kakao))]
    #[case("export", Command::Export { format: ExportFormat::Csv, path: None })]
    #[case(
        "export out.csv",
        Command::Export { format: ExportFormat::Csv, path: Some("out.csv".into()) }
    )]
    #[case("export JSON", Command::Export { format: ExportFormat::Json, path: None })]
    #[case(
        "export json parts.json",
        Command::Export { format: ExportFormat::Json, path: Some("parts.json".into()) }
    )]
    #[case("calc 1 + 2", Command::Calculate("1 + 2".to_string()))]
    fn test_parse(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(line.parse::<Command>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("page two")]
    #[case("filter pitch wide")]
    #[case("filter colour red")]
    #[case("login admin onlyid")]
    #[case("speed 12.7 20")]
    #[case("dance")]
    fn test_parse_rejects(#[case] line: &str) {
        assert!(matches!(line.parse::<Command>(), Err(CatalogError::Validation { .. })));
    }
}
