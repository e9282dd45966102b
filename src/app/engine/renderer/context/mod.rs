use crate::app::config::AppConfig;
use anyhow::{Context as _, Result, anyhow};
use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::os::raw::c_void;
use thiserror::Error;
use vulkanalia::Version;
use vulkanalia::loader::{LIBRARY, LibloadingLoader};
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk;
use vulkanalia::window as vk_window;
use winit::window::Window;

use vulkanalia::vk::ExtDebugUtilsExtension;

mod capabilities;

const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Validation layers requested, but not available: {}.", .0.join(", "))]
    MissingLayers(Vec<String>),
    #[error("Required instance extensions not available: {}.", .0.join(", "))]
    MissingExtensions(Vec<String>),
    #[error("Failed to create instance: {0}.")]
    InstanceCreation(vk::ErrorCode),
}

/// Owns the Vulkan instance and, with validation on, its debug messenger.
/// Both are destroyed on drop; the loader stays alive until after that.
pub struct Context {
    instance: Instance,
    messenger: Option<vk::DebugUtilsMessengerEXT>,
    _entry: Entry,
}

impl Context {
    pub unsafe fn create(window: &Window, config: &AppConfig) -> Result<Self> {
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }
            .context("Failed to load the Vulkan library.")?;
        let entry = unsafe { Entry::new(loader) }.map_err(|e| anyhow!("{}", e))?;

        let (instance, messenger) = unsafe { Self::create_instance(window, &entry, config)? };

        Ok(Self {
            instance,
            messenger,
            _entry: entry,
        })
    }

    pub fn validation_enabled(&self) -> bool {
        self.messenger.is_some()
    }

    unsafe fn create_instance(
        window: &Window,
        entry: &Entry,
        config: &AppConfig,
    ) -> Result<(Instance, Option<vk::DebugUtilsMessengerEXT>)> {
        let validation = &config.validation;
        let metadata = &config.application;

        // Layers
        let available_layers = unsafe { entry.enumerate_instance_layer_properties()? }
            .iter()
            .map(|l| l.layer_name.to_string())
            .collect::<HashSet<_>>();

        tracing::info!("available validation layers:");
        for layer in capabilities::matched(validation.layers(), &available_layers) {
            tracing::info!("\t{}", layer.to_string_lossy());
        }

        let layers = capabilities::negotiate_layers(
            validation.layers(),
            &available_layers,
            validation.enabled(),
        )?;

        // Extensions
        let available_extensions =
            unsafe { entry.enumerate_instance_extension_properties(None)? }
                .iter()
                .map(|e| e.extension_name.to_string())
                .collect::<Vec<_>>();

        tracing::info!("available extensions:");
        for extension in &available_extensions {
            tracing::info!("\t{}", extension);
        }

        let mut extensions = vk_window::get_required_instance_extensions(window)
            .iter()
            .map(|e| extension_name(e))
            .collect::<Vec<_>>();

        if validation.enabled() {
            extensions.push(extension_name(&vk::EXT_DEBUG_UTILS_EXTENSION.name));
        }

        // Enable portability extensions for MoltenVK on macOS
        let flags = if cfg!(target_os = "macos") && entry.version()? >= PORTABILITY_MACOS_VERSION {
            extensions.push(extension_name(
                &vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name,
            ));
            extensions.push(extension_name(
                &vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name,
            ));
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };

        capabilities::check_extensions(
            &extensions,
            &available_extensions.into_iter().collect::<HashSet<_>>(),
        )?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(metadata.name.as_bytes_with_nul())
            .application_version(make_version(metadata.version))
            .engine_name(metadata.engine_name.as_bytes_with_nul())
            .engine_version(make_version(metadata.engine_version))
            .api_version(make_version(metadata.api_version));

        let layer_names = layers.iter().map(|l| l.as_ptr()).collect::<Vec<_>>();
        let extension_names = extensions.iter().map(|e| e.as_ptr()).collect::<Vec<_>>();

        let mut info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names)
            .flags(flags);

        // Covers messages emitted during vkCreateInstance/vkDestroyInstance.
        let mut debug_info = Self::debug_messenger_info();
        if validation.enabled() {
            info = info.push_next(&mut debug_info);
        }

        let instance =
            unsafe { entry.create_instance(&info, None) }.map_err(ContextError::InstanceCreation)?;
        tracing::info!(
            "Created Vulkan instance (layers: {}, extensions: {}).",
            layer_names.len(),
            extension_names.len()
        );

        if !validation.enabled() {
            return Ok((instance, None));
        }

        let debug_info = Self::debug_messenger_info();
        match unsafe { instance.create_debug_utils_messenger_ext(&debug_info, None) } {
            Ok(messenger) => Ok((instance, Some(messenger))),
            Err(error) => {
                unsafe { instance.destroy_instance(None) };
                Err(error.into())
            }
        }
    }

    fn debug_messenger_info() -> vk::DebugUtilsMessengerCreateInfoEXTBuilder<'static> {
        vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::all())
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .user_callback(Some(Self::debug_callback))
    }

    pub extern "system" fn debug_callback(
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        type_: vk::DebugUtilsMessageTypeFlagsEXT,
        data: *const vk::DebugUtilsMessengerCallbackDataEXT,
        _: *mut c_void,
    ) -> vk::Bool32 {
        let data = unsafe { *data };
        let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

        if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
            tracing::error!("({:?}) {}", type_, message);
        } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
            tracing::warn!("({:?}) {}", type_, message);
        } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
            tracing::debug!("({:?}) {}", type_, message);
        } else {
            tracing::trace!("({:?}) {}", type_, message);
        }

        vk::FALSE
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe {
            if let Some(messenger) = self.messenger.take() {
                self.instance
                    .destroy_debug_utils_messenger_ext(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
        tracing::debug!("Destroyed Vulkan instance.");
    }
}

fn extension_name(name: &vk::ExtensionName) -> CString {
    unsafe { CStr::from_ptr(name.as_ptr()) }.to_owned()
}

fn make_version(version: Version) -> u32 {
    vk::make_version(version.major, version.minor, version.patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_name_round_trips_constant() {
        assert_eq!(
            extension_name(&vk::EXT_DEBUG_UTILS_EXTENSION.name).as_c_str(),
            c"VK_EXT_debug_utils"
        );
    }

    #[test]
    fn missing_layer_message_names_layer() {
        let err = ContextError::MissingLayers(vec!["VK_LAYER_KHRONOS_validation".into()]);
        assert_eq!(
            err.to_string(),
            "Validation layers requested, but not available: VK_LAYER_KHRONOS_validation."
        );
    }

    #[test]
    fn api_version_is_1_0() {
        let metadata = crate::app::config::ApplicationInfo::default();
        assert_eq!(make_version(metadata.api_version), vk::make_version(1, 0, 0));
    }
}
