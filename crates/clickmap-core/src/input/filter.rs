// Clickmap Input Layer - Device Filtering
// Device matching logic for autodetection and manual filtering

/// Check if a device should be grabbed as a pointer source.
///
/// 1. If filter names are given, only devices matching by path or name are used
/// 2. Otherwise virtual devices and non-pointers are excluded
///
/// # Arguments
/// * `device_name` - The device name from evdev
/// * `device_path` - The device path (e.g., "/dev/input/event0")
/// * `filter_names` - Device names/paths to match (empty for autodetect)
/// * `is_pointer` - Whether the device is a pointer (from is_pointer())
/// * `is_virtual` - Whether the device is one of our virtual devices
pub fn matches_device_filter(
    device_name: &str,
    device_path: &str,
    filter_names: &[String],
    is_pointer: bool,
    is_virtual: bool,
) -> bool {
    if !filter_names.is_empty() {
        return filter_names
            .iter()
            .any(|match_name| device_path == match_name || device_name == match_name);
    }

    !is_virtual && is_pointer
}
