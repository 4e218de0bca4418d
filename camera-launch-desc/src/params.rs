//! Parameter file loading.
//!
//! A ROS 2 parameter file maps node names to a `ros__parameters` table:
//!
//! ```yaml
//! /camera/generic_camera_node:
//!   ros__parameters:
//!     frame_rate: 30
//!     image:
//!       width: 640
//! ```
//!
//! Nested tables are flattened with `.` separators, yielding
//! `frame_rate = 30` and `image.width = 640`.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::ParamFileError;

const ROS_PARAMETERS_KEY: &str = "ros__parameters";

/// Parses the parameters in `content`, read from `path`, that apply to the
/// node `fq_name`.
pub fn parse_param_file(
    content: &str,
    path: &Path,
    fq_name: &str,
) -> Result<Vec<(String, String)>, ParamFileError> {
    parse_params(content, fq_name).map_err(|err| match err {
        ParseFailure::Yaml(source) => ParamFileError::Yaml {
            path: path.to_owned(),
            source,
        },
        ParseFailure::NotAMapping => ParamFileError::NotAMapping {
            path: path.to_owned(),
        },
    })
}

enum ParseFailure {
    Yaml(serde_yaml::Error),
    NotAMapping,
}

fn parse_params(content: &str, fq_name: &str) -> Result<Vec<(String, String)>, ParseFailure> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let root: Value = serde_yaml::from_str(content).map_err(ParseFailure::Yaml)?;
    let root = match root {
        Value::Mapping(map) => map,
        Value::Null => return Ok(vec![]),
        _ => return Err(ParseFailure::NotAMapping),
    };

    let mut params = vec![];

    for (key, value) in &root {
        let key = match key.as_str() {
            Some(key) => key,
            None => continue,
        };
        if !node_key_matches(key, fq_name) {
            continue;
        }
        if let Some(Value::Mapping(table)) = value.get(ROS_PARAMETERS_KEY) {
            flatten(table, "", &mut params);
        }
    }

    Ok(params)
}

/// Matches a node key against a fully qualified node name. Keys are
/// absolute, `*` matches one name token and `**` any number of tokens.
/// Wildcards inside a token, such as `cam*`, are not supported.
fn node_key_matches(key: &str, fq_name: &str) -> bool {
    let pattern: Vec<_> = key.trim_start_matches('/').split('/').collect();
    let name: Vec<_> = fq_name.trim_start_matches('/').split('/').collect();
    tokens_match(&pattern, &name)
}

fn tokens_match(pattern: &[&str], name: &[&str]) -> bool {
    match (pattern.split_first(), name.split_first()) {
        (None, None) => true,
        (Some((&"**", rest)), _) => {
            tokens_match(rest, name) || (!name.is_empty() && tokens_match(pattern, &name[1..]))
        }
        (Some((&"*", rest)), Some((_, name_rest))) => tokens_match(rest, name_rest),
        (Some((token, rest)), Some((head, name_rest))) => {
            token == head && tokens_match(rest, name_rest)
        }
        _ => false,
    }
}

fn flatten(table: &Mapping, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let key = match scalar_to_string(key) {
            Some(key) => key,
            None => continue,
        };
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Mapping(inner) => flatten(inner, &name, out),
            value => out.push((name, value_to_string(value))),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(yes) => Some(yes.to_string()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Sequence(items) => {
            let items: Vec<_> = items.iter().map(value_to_string).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Tagged(tagged) => value_to_string(&tagged.value),
        Value::Mapping(_) => String::new(),
        scalar => scalar_to_string(scalar).unwrap_or_default(),
    }
}
