//! Parsers for the runtime's list output

use serde_json::{Map, Value};
use tracing::error;

use crate::core::{ContainerRecord, ContainerStatus, ImageRecord, Result, RuntimeError};
use crate::runtime::OutputFormat;

/// `--format` template for `ps`
pub fn container_template(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "{{json .}}",
        OutputFormat::Text => "{{.ID}} {{.Names}} {{.Status}}",
    }
}

/// `--format` template for `images`
pub fn image_template(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "{{json .}}",
        OutputFormat::Text => "{{.ID}}\t{{.Repository}}\t{{.Tag}}",
    }
}

/// Parse `ps` output into container records, in listing order.
///
/// Blank lines are skipped. Any other line that does not match the requested
/// format fails the whole listing.
pub fn parse_containers(
    output: &str,
    format: OutputFormat,
    command: &str,
) -> Result<Vec<ContainerRecord>> {
    parse_lines(output, command, |line| match format {
        OutputFormat::Json => container_from_json(line),
        OutputFormat::Text => container_from_text(line),
    })
}

/// Parse `images` output into image records, in listing order.
pub fn parse_images(output: &str, format: OutputFormat, command: &str) -> Result<Vec<ImageRecord>> {
    parse_lines(output, command, |line| match format {
        OutputFormat::Json => image_from_json(line),
        OutputFormat::Text => image_from_text(line),
    })
}

fn parse_lines<T>(
    output: &str,
    command: &str,
    parse: impl Fn(&str) -> std::result::Result<T, String>,
) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse(trimmed) {
            Ok(record) => records.push(record),
            Err(reason) => {
                error!("Unparseable `{}` output line {}: {}", command, idx + 1, line);
                return Err(RuntimeError::Parse {
                    command: command.to_string(),
                    line: idx + 1,
                    reason,
                }
                .into());
            }
        }
    }
    Ok(records)
}

fn container_from_text(line: &str) -> std::result::Result<ContainerRecord, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(format!(
            "expected ID, name and status, found {} field(s)",
            fields.len()
        ));
    }
    let status_text = fields[2..].join(" ");
    Ok(ContainerRecord::new(
        fields[0],
        fields[1],
        ContainerStatus::from_status_text(&status_text),
    ))
}

fn image_from_text(line: &str) -> std::result::Result<ImageRecord, String> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    match fields.as_slice() {
        [id, repository, tag] if !id.is_empty() => Ok(ImageRecord::new(*id, *repository, *tag)),
        [_, _, _] => Err("empty image ID".to_string()),
        _ => Err(format!(
            "expected tab-separated ID, repository and tag, found {} field(s)",
            fields.len()
        )),
    }
}

fn json_object(line: &str) -> std::result::Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}

/// First non-empty string under any of `keys`; arrays yield their first element
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = match obj.get(*key)? {
            Value::String(s) => s.clone(),
            Value::Array(items) => items.first()?.as_str()?.to_string(),
            _ => return None,
        };
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    })
}

fn container_from_json(line: &str) -> std::result::Result<ContainerRecord, String> {
    let obj = json_object(line)?;
    let id = string_field(&obj, &["ID", "Id"]).ok_or("missing container ID")?;
    let names = string_field(&obj, &["Names", "Name"]).ok_or("missing container name")?;
    // Docker joins multiple names with commas
    let name = names
        .split(',')
        .next()
        .unwrap_or(&names)
        .trim_start_matches('/')
        .to_string();

    let status = match string_field(&obj, &["State"]) {
        Some(state) if state.eq_ignore_ascii_case("running") => ContainerStatus::Running,
        Some(_) => ContainerStatus::Stopped,
        None => string_field(&obj, &["Status"])
            .map(|s| ContainerStatus::from_status_text(&s))
            .unwrap_or(ContainerStatus::Stopped),
    };

    Ok(ContainerRecord::new(id, name, status))
}

fn image_from_json(line: &str) -> std::result::Result<ImageRecord, String> {
    let obj = json_object(line)?;
    let id = string_field(&obj, &["ID", "Id"]).ok_or("missing image ID")?;
    let repository = string_field(&obj, &["Repository"]).unwrap_or_else(|| "<none>".to_string());
    let tag = string_field(&obj, &["Tag"]).unwrap_or_else(|| "<none>".to_string());
    Ok(ImageRecord::new(id, repository, tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_containers() {
        let output = "abc123 web Up 2 minutes\ndef456 db Exited (0) 3 hours ago\n";
        let records = parse_containers(output, OutputFormat::Text, "docker ps").unwrap();
        assert_eq!(
            records,
            vec![
                ContainerRecord::new("abc123", "web", ContainerStatus::Running),
                ContainerRecord::new("def456", "db", ContainerStatus::Stopped),
            ]
        );
    }

    #[test]
    fn test_empty_output_is_empty_snapshot() {
        assert!(parse_containers("", OutputFormat::Text, "ps").unwrap().is_empty());
        assert!(parse_images("\n\n", OutputFormat::Json, "images")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_text_container_too_few_fields() {
        let output = "abc123 web Up 1 second\nbroken\n";
        let err = parse_containers(output, OutputFormat::Text, "docker ps").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_text_images_allow_spaces() {
        let output = "sha256:aaa\tmy registry/app\tv1 beta\n";
        let records = parse_images(output, OutputFormat::Text, "docker images").unwrap();
        assert_eq!(
            records,
            vec![ImageRecord::new("sha256:aaa", "my registry/app", "v1 beta")]
        );
    }

    #[test]
    fn test_text_images_wrong_shape() {
        let err = parse_images("nginx latest abc123", OutputFormat::Text, "images").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_json_containers() {
        let output = concat!(
            r#"{"ID":"abc123","Names":"web","State":"running","Status":"Up 2 minutes"}"#,
            "\n",
            r#"{"ID":"def456","Names":"db,db-alias","State":"exited","Status":"Exited (0) 3 hours ago"}"#,
            "\n",
        );
        let records = parse_containers(output, OutputFormat::Json, "docker ps").unwrap();
        assert_eq!(
            records,
            vec![
                ContainerRecord::new("abc123", "web", ContainerStatus::Running),
                ContainerRecord::new("def456", "db", ContainerStatus::Stopped),
            ]
        );
    }

    #[test]
    fn test_json_containers_podman_shape() {
        let output = r#"{"Id":"fff000","Names":["cache"],"Status":"Up 5 seconds"}"#;
        let records = parse_containers(output, OutputFormat::Json, "podman ps").unwrap();
        assert_eq!(
            records,
            vec![ContainerRecord::new("fff000", "cache", ContainerStatus::Running)]
        );
    }

    #[test]
    fn test_json_missing_id_is_parse_error() {
        let err =
            parse_containers(r#"{"Names":"web"}"#, OutputFormat::Json, "docker ps").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("missing container ID"));
    }

    #[test]
    fn test_json_not_an_object() {
        let err = parse_images("abc def ghi", OutputFormat::Json, "docker images").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_json_images() {
        let output = concat!(
            r#"{"ID":"sha256:111","Repository":"ghcr.io/acme/api","Tag":"1.0"}"#,
            "\n",
            r#"{"ID":"sha256:222","Repository":"<none>","Tag":"<none>"}"#,
        );
        let records = parse_images(output, OutputFormat::Json, "docker images").unwrap();
        assert_eq!(
            records,
            vec![
                ImageRecord::new("sha256:111", "ghcr.io/acme/api", "1.0"),
                ImageRecord::new("sha256:222", "<none>", "<none>"),
            ]
        );
    }

    #[test]
    fn test_templates() {
        assert_eq!(container_template(OutputFormat::Json), "{{json .}}");
        assert!(image_template(OutputFormat::Text).contains('\t'));
    }
}
