//! Command-line and settings-file handling.
//!
//! Nothing here is fatal: a missing or malformed value is logged and replaced
//! by its default.

use orb_renderer::{CameraSettings, RenderConfig};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const DEFAULT_SPHERE_COUNT: usize = 20;
pub const DEFAULT_OUTPUT: &str = "output.ppm";

/// Scene generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub sphere_count: usize,
    /// Seed for scene layout and BVH axes; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            sphere_count: DEFAULT_SPHERE_COUNT,
            seed: None,
        }
    }
}

/// Everything a render run needs, as read from a JSON settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    pub camera: CameraSettings,
    pub scene: SceneSettings,
}

impl Settings {
    /// Read settings from `path`, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Cannot read settings {}: {}, using defaults", path.display(), err);
                return Self::default();
            }
        };

        let root: Value = match serde_json::from_str(&text) {
            Ok(root) => root,
            Err(err) => {
                log::warn!("Malformed settings {}: {}, using defaults", path.display(), err);
                return Self::default();
            }
        };

        let settings = Self::from_value(&root);
        log::info!("Loaded settings from {}", path.display());
        settings
    }

    /// Decode each section field by field; a bad field keeps its default and
    /// leaves its neighbours alone.
    pub fn from_value(root: &Value) -> Self {
        let Some(sections) = root.as_object() else {
            log::warn!("Settings must be a JSON object, using defaults");
            return Self::default();
        };

        for key in sections.keys() {
            if !matches!(key.as_str(), "render" | "camera" | "scene") {
                log::warn!("Ignoring unknown settings section {:?}", key);
            }
        }

        Self {
            render: merge_section("render", sections.get("render")),
            camera: merge_section("camera", sections.get("camera")),
            scene: merge_section("scene", sections.get("scene")),
        }
    }
}

/// Overlay the fields of `value` onto `T::default()` one at a time.
fn merge_section<T>(name: &str, value: Option<&Value>) -> T
where
    T: Default + Serialize + DeserializeOwned,
{
    let Some(value) = value else {
        return T::default();
    };
    let Some(fields) = value.as_object() else {
        log::warn!("Settings section {:?} must be an object, using defaults", name);
        return T::default();
    };
    let mut merged: Map<String, Value> = match serde_json::to_value(T::default()) {
        Ok(Value::Object(defaults)) => defaults,
        _ => return T::default(),
    };

    for (key, field) in fields {
        if !merged.contains_key(key) {
            log::warn!("Ignoring unknown setting {}.{}", name, key);
            continue;
        }

        let mut candidate = merged.clone();
        candidate.insert(key.clone(), field.clone());
        match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(err) => log::warn!("Invalid {}.{}: {}, using default", name, key, err),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}

/// Parsed command line: `[sphere_count] [output_file] [max_depth] [--settings FILE]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub sphere_count: Option<usize>,
    pub output: Option<PathBuf>,
    pub max_depth: Option<u32>,
    pub settings: Option<PathBuf>,
}

impl CliArgs {
    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if arg == "--settings" {
                match args.next() {
                    Some(path) => parsed.settings = Some(PathBuf::from(path)),
                    None => log::warn!("--settings needs a file argument, ignoring"),
                }
            } else {
                positional.push(arg);
            }
        }

        if positional.len() < 3 {
            log::warn!(
                "Usage: orb [sphere_count] [output_file] [max_depth] [--settings FILE]; \
                 using defaults for missing parameters"
            );
        }

        let mut positional = positional.into_iter();
        parsed.sphere_count = positional.next().and_then(|v| parse_or_warn(&v, "sphere_count"));
        parsed.output = positional.next().map(PathBuf::from);
        parsed.max_depth = positional.next().and_then(|v| parse_or_warn(&v, "max_depth"));
        for extra in positional {
            log::warn!("Ignoring extra argument {:?}", extra);
        }

        parsed
    }

    /// Merge over `settings`; explicit arguments win.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(count) = self.sphere_count {
            settings.scene.sphere_count = count;
        }
        if let Some(depth) = self.max_depth {
            settings.render.max_depth = depth;
        }
        settings.render = settings.render.sanitized();
        settings
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

fn parse_or_warn<T: std::str::FromStr>(value: &str, name: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Invalid {} {:?}, using default", name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CliArgs {
        CliArgs::parse(list.iter().map(|s| s.to_string()))
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("orb_cli_{}_{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_positional_arguments() {
        let parsed = args(&["40", "scene.png", "12"]);

        assert_eq!(parsed.sphere_count, Some(40));
        assert_eq!(parsed.output, Some(PathBuf::from("scene.png")));
        assert_eq!(parsed.max_depth, Some(12));
        assert_eq!(parsed.settings, None);
    }

    #[test]
    fn test_parse_missing_arguments_use_defaults() {
        let parsed = args(&[]);
        let settings = parsed.apply(Settings::default());

        assert_eq!(parsed.output_path(), PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(settings.scene.sphere_count, DEFAULT_SPHERE_COUNT);
        assert_eq!(settings.render.max_depth, RenderConfig::default().max_depth);
    }

    #[test]
    fn test_parse_invalid_numbers_fall_back() {
        let parsed = args(&["lots", "out.ppm", "-3"]);

        assert_eq!(parsed.sphere_count, None);
        assert_eq!(parsed.max_depth, None);
        assert_eq!(parsed.output_path(), PathBuf::from("out.ppm"));
    }

    #[test]
    fn test_parse_settings_flag_anywhere() {
        let parsed = args(&["5", "--settings", "cfg.json", "out.png"]);

        assert_eq!(parsed.settings, Some(PathBuf::from("cfg.json")));
        assert_eq!(parsed.sphere_count, Some(5));
        assert_eq!(parsed.output, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_zero_depth_argument_is_sanitized() {
        let settings = args(&["5", "out.ppm", "0"]).apply(Settings::default());
        assert_eq!(settings.render.max_depth, RenderConfig::default().max_depth);
    }

    #[test]
    fn test_load_partial_settings() {
        let path = temp_file(
            "partial.json",
            r#"{ "render": { "image_width": 64, "samples_per_pixel": 4 },
                 "camera": { "vfov": 35.0, "look_at": [0.0, 1.0, 0.0] },
                 "scene": { "seed": 7 } }"#,
        );

        let settings = Settings::load_or_default(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.render.image_width, 64);
        assert_eq!(settings.render.samples_per_pixel, 4);
        assert_eq!(settings.render.max_depth, RenderConfig::default().max_depth);
        assert_eq!(settings.camera.vfov, 35.0);
        assert_eq!(settings.camera.look_at, orb_renderer::Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(settings.camera.aperture, CameraSettings::default().aperture);
        assert_eq!(settings.scene.seed, Some(7));
        assert_eq!(settings.scene.sphere_count, DEFAULT_SPHERE_COUNT);
    }

    #[test]
    fn test_bad_field_keeps_its_neighbours() {
        let path = temp_file(
            "one_bad_field.json",
            r#"{ "render": { "image_width": 64, "samples_per_pixel": -4 },
                 "camera": { "vfov": "wide", "aperture": 0.0 },
                 "scene": { "sphere_count": 5 } }"#,
        );

        let settings = Settings::load_or_default(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.render.image_width, 64);
        assert_eq!(settings.render.samples_per_pixel, RenderConfig::default().samples_per_pixel);
        assert_eq!(settings.camera.vfov, CameraSettings::default().vfov);
        assert_eq!(settings.camera.aperture, 0.0);
        assert_eq!(settings.scene.sphere_count, 5);
    }

    #[test]
    fn test_unknown_and_misshapen_sections_are_skipped() {
        let root = serde_json::json!({
            "render": [1, 2, 3],
            "scene": { "sphere_count": 9, "colour": "blue" },
            "lights": {}
        });

        let settings = Settings::from_value(&root);
        assert_eq!(settings.render, RenderConfig::default());
        assert_eq!(settings.scene.sphere_count, 9);
        assert_eq!(settings.scene.seed, None);
    }

    #[test]
    fn test_load_malformed_settings_falls_back() {
        let path = temp_file("broken.json", "{ render: nope");
        let settings = Settings::load_or_default(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_missing_settings_falls_back() {
        let path = std::env::temp_dir().join("orb_cli_definitely_missing.json");
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn test_arguments_override_settings() {
        let mut base = Settings::default();
        base.scene.sphere_count = 3;
        base.render.max_depth = 7;

        let settings = args(&["50", "x.ppm", "9"]).apply(base);
        assert_eq!(settings.scene.sphere_count, 50);
        assert_eq!(settings.render.max_depth, 9);
    }
}
