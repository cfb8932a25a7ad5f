//! YAML processing utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use yaml_rust_davvid::YamlEmitter;

/// Serializes a value to YAML, keeping multi-line answers as block scalars.
///
/// The emitter writes a bare `|` block, which only reads back unchanged for
/// some strings. If any multi-line string in the document is not one of
/// them, every string is written quoted instead.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    // serde_yaml decides the data model; yaml-rust handles the layout
    let serde_value = serde_yaml::to_value(data).context("Failed to serialize to serde value")?;
    let yaml_rust_value = convert_serde_to_yaml_rust(&serde_value);

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(block_scalars_round_trip(&serde_value));
    emitter
        .dump(&yaml_rust_value)
        .context("Failed to emit YAML")?;

    Ok(output)
}

/// Returns true if `text` survives a clipped `|` block scalar.
fn is_block_safe(text: &str) -> bool {
    if !text.contains('\n') {
        return true;
    }
    !text.starts_with(char::is_whitespace)
        && text.ends_with('\n')
        && !text.ends_with("\n\n")
        && !text.contains('\r')
}

fn block_scalars_round_trip(value: &serde_yaml::Value) -> bool {
    match value {
        serde_yaml::Value::String(s) => is_block_safe(s),
        serde_yaml::Value::Sequence(seq) => seq.iter().all(block_scalars_round_trip),
        serde_yaml::Value::Mapping(map) => map
            .iter()
            .all(|(k, v)| block_scalars_round_trip(k) && block_scalars_round_trip(v)),
        serde_yaml::Value::Tagged(tagged) => block_scalars_round_trip(&tagged.value),
        _ => true,
    }
}

fn convert_serde_to_yaml_rust(value: &serde_yaml::Value) -> yaml_rust_davvid::Yaml {
    use yaml_rust_davvid::Yaml;

    match value {
        serde_yaml::Value::Null => Yaml::Null,
        serde_yaml::Value::Bool(b) => Yaml::Boolean(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Yaml::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Yaml::Real(f.to_string())
            } else {
                Yaml::String(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => Yaml::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            Yaml::Array(seq.iter().map(convert_serde_to_yaml_rust).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut yaml_map = yaml_rust_davvid::yaml::Hash::new();
            for (k, v) in map {
                yaml_map.insert(convert_serde_to_yaml_rust(k), convert_serde_to_yaml_rust(v));
            }
            Yaml::Hash(yaml_map)
        }
        serde_yaml::Value::Tagged(tagged) => convert_serde_to_yaml_rust(&tagged.value),
    }
}

/// Deserializes a YAML string.
pub fn from_yaml<T: for<'de> Deserialize<'de>>(yaml: &str) -> Result<T> {
    serde_yaml::from_str(yaml).context("Failed to deserialize YAML")
}

/// Reads and parses a YAML file.
pub fn read_yaml_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read file: {}", path.as_ref().display()))?;

    from_yaml(&content)
}

/// Writes a value to a YAML file.
pub fn write_yaml_file<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let mut yaml_content = to_yaml(data)?;
    // A block scalar at the end of the document needs its line break
    yaml_content.push('\n');

    fs::write(&path, yaml_content)
        .with_context(|| format!("Failed to write file: {}", path.as_ref().display()))?;

    Ok(())
}
