//! Layer and extension negotiation against what the host reports.
//!
//! Kept free of Vulkan calls so both validation branches can be checked
//! without a driver.

use super::ContextError;
use std::collections::HashSet;
use std::ffi::{CStr, CString};

/// Names in `requested` that `available` does not contain, in request order.
pub fn missing(requested: &[CString], available: &HashSet<String>) -> Vec<String> {
    requested
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !available.contains(name))
        .collect()
}

pub fn matched<'a>(
    requested: &'a [CString],
    available: &'a HashSet<String>,
) -> impl Iterator<Item = &'a CStr> + 'a {
    requested
        .iter()
        .filter(|name| available.contains(&*name.to_string_lossy()))
        .map(CString::as_c_str)
}

/// Layers to enable on the instance. Empty when validation is off, whatever
/// the host provides.
pub fn negotiate_layers(
    requested: &[CString],
    available: &HashSet<String>,
    enabled: bool,
) -> Result<Vec<CString>, ContextError> {
    if !enabled {
        return Ok(Vec::new());
    }

    let missing = missing(requested, available);
    if !missing.is_empty() {
        return Err(ContextError::MissingLayers(missing));
    }

    Ok(requested.to_vec())
}

pub fn check_extensions(
    required: &[CString],
    available: &HashSet<String>,
) -> Result<(), ContextError> {
    let missing = missing(required, available);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ContextError::MissingExtensions(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KHRONOS: &CStr = c"VK_LAYER_KHRONOS_validation";

    fn available(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn layer_present_and_enabled() {
        let layers = negotiate_layers(
            &[KHRONOS.to_owned()],
            &available(&["VK_LAYER_KHRONOS_validation", "VK_LAYER_MESA_overlay"]),
            true,
        )
        .unwrap();
        assert_eq!(layers, vec![KHRONOS.to_owned()]);
    }

    #[test]
    fn layer_missing_and_enabled() {
        let err = negotiate_layers(
            &[KHRONOS.to_owned()],
            &available(&["VK_LAYER_MESA_overlay"]),
            true,
        )
        .unwrap_err();
        match err {
            ContextError::MissingLayers(names) => {
                assert_eq!(names, vec!["VK_LAYER_KHRONOS_validation".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn disabled_ignores_availability() {
        let layers = negotiate_layers(&[KHRONOS.to_owned()], &available(&[]), false).unwrap();
        assert!(layers.is_empty());
    }

    #[test]
    fn matched_lists_only_present_layers() {
        let requested = [KHRONOS.to_owned(), c"VK_LAYER_LUNARG_api_dump".to_owned()];
        let host = available(&["VK_LAYER_LUNARG_api_dump"]);
        let found = matched(&requested, &host).collect::<Vec<_>>();
        assert_eq!(found, vec![c"VK_LAYER_LUNARG_api_dump"]);
    }

    #[test]
    fn every_required_extension_is_checked() {
        let required = [
            c"VK_KHR_surface".to_owned(),
            c"VK_KHR_xcb_surface".to_owned(),
            c"VK_EXT_debug_utils".to_owned(),
        ];

        check_extensions(
            &required,
            &available(&["VK_KHR_surface", "VK_KHR_xcb_surface", "VK_EXT_debug_utils"]),
        )
        .unwrap();

        let err = check_extensions(&required, &available(&["VK_KHR_surface"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required instance extensions not available: VK_KHR_xcb_surface, VK_EXT_debug_utils."
        );
    }
}
