use std::env;
use std::ffi::CString;
use thiserror::Error;
use vulkanalia::Version;
use winit::dpi::LogicalSize;
use winit::window::WindowAttributes;

/// Overrides the build-derived validation default when set.
pub const VALIDATION_ENV: &str = "VULKAN_VALIDATION";

const WINDOW_TITLE: &str = "Vulkan";
const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Window dimensions must be non-zero (got {width}x{height}).")]
    ZeroDimension { width: u32, height: u32 },
    #[error("Layer name must not be empty.")]
    EmptyLayerName,
    #[error("Layer name `{0}` contains a NUL byte.")]
    NulInLayerName(String),
    #[error("Unrecognized value `{value}` for {var}.")]
    InvalidToggle { var: &'static str, value: String },
}

/// Startup configuration handed to [`crate::app::App`].
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub validation: ValidationConfig,
    pub application: ApplicationInfo,
}

impl AppConfig {
    /// Fixed 800x600 window, Khronos validation in debug builds.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            window: WindowConfig::new(WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT)?,
            validation: ValidationConfig::new(cfg!(debug_assertions), [VALIDATION_LAYER])?,
            application: ApplicationInfo::default(),
        })
    }

    /// [`AppConfig::new`], with validation optionally overridden by [`VALIDATION_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = env::var(VALIDATION_ENV).ok();
        Self::new()?.with_validation_override(value.as_deref())
    }

    pub fn with_validation_override(mut self, value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = value {
            let enabled = parse_toggle(value).ok_or_else(|| ConfigError::InvalidToggle {
                var: VALIDATION_ENV,
                value: value.to_owned(),
            })?;
            self.validation = self.validation.with_enabled(enabled);
        }
        Ok(self)
    }
}

fn parse_toggle(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct WindowConfig {
    title: String,
    width: u32,
    height: u32,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }
        Ok(Self {
            title: title.into(),
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Fixed-size, non-resizable and hidden until the instance exists.
    pub fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_resizable(false)
            .with_visible(false)
    }
}

#[derive(Clone, Debug)]
pub struct ValidationConfig {
    enabled: bool,
    layers: Vec<CString>,
}

impl ValidationConfig {
    pub fn new<I, S>(enabled: bool, layers: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layers = layers
            .into_iter()
            .map(|name| {
                let name = name.into();
                if name.is_empty() {
                    return Err(ConfigError::EmptyLayerName);
                }
                CString::new(name.clone()).map_err(|_| ConfigError::NulInLayerName(name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { enabled, layers })
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn layers(&self) -> &[CString] {
        &self.layers
    }
}

/// Metadata reported to the driver through `VkApplicationInfo`.
#[derive(Clone, Debug)]
pub struct ApplicationInfo {
    pub name: CString,
    pub version: Version,
    pub engine_name: CString,
    pub engine_version: Version,
    pub api_version: Version,
}

impl Default for ApplicationInfo {
    fn default() -> Self {
        Self {
            name: c"Hello Triangle".to_owned(),
            version: Version::new(1, 0, 0),
            engine_name: c"No Engine".to_owned(),
            engine_version: Version::new(1, 0, 0),
            api_version: Version::new(1, 0, 0),
        }
    }
}
