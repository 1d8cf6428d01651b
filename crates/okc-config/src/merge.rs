//! Table-by-table merging of TOML layers.

use std::collections::BTreeSet;

/// Recursively deep-merge `overlay` into `base`.
///
/// Tables merge per key; scalars and arrays from the overlay replace the
/// base value.
pub(crate) fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Dotted paths of every leaf in `value` (e.g. `playback.tick_ms`).
pub(crate) fn leaf_paths(value: &toml::Value) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    collect_leaves(value, "", &mut paths);
    paths
}

fn collect_leaves(value: &toml::Value, prefix: &str, paths: &mut BTreeSet<String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaves(child, &path, paths);
            }
        },
        _ => {
            paths.insert(prefix.to_owned());
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_overlay_replaces_scalars_and_keeps_siblings() {
        let mut base = parse("[playback]\ntick_ms = 100\nline_ms = 200\n");
        deep_merge(&mut base, &parse("[playback]\ntick_ms = 50\n"));
        assert_eq!(base["playback"]["tick_ms"].as_integer(), Some(50));
        assert_eq!(base["playback"]["line_ms"].as_integer(), Some(200));
    }

    #[test]
    fn test_overlay_adds_new_tables() {
        let mut base = parse("[playback]\ntick_ms = 100\n");
        deep_merge(&mut base, &parse("[ui]\nframe_ms = 33\n"));
        assert_eq!(base["ui"]["frame_ms"].as_integer(), Some(33));
    }

    #[test]
    fn test_arrays_are_replaced() {
        let mut base = parse("[logging]\ndirectives = [\"a=debug\", \"b=info\"]\n");
        deep_merge(&mut base, &parse("[logging]\ndirectives = [\"c=trace\"]\n"));
        assert_eq!(base["logging"]["directives"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_leaf_paths() {
        let paths = leaf_paths(&parse("[playback]\ntick_ms = 1\n[logging]\nlevel = \"x\"\n"));
        let paths: Vec<_> = paths.into_iter().collect();
        assert_eq!(paths, ["logging.level", "playback.tick_ms"]);
    }
}
