//! Device registry fed from a store document.
//!
//! A dashboard keeps one JSON object per device under a common path, keyed by
//! device name:
//!
//! ```json
//! {"lamp":{"icon":"bulb.png","state":true,"sliderEnabled":true,"sliderValue":40,"order":1}}
//! ```
//!
//! The application owns a [`DeviceRegistry`], registers the devices it drives
//! and periodically hands the text returned by a `get_json` call to
//! [`DeviceRegistry::poll`]. Only registered devices are updated; entries for
//! unknown names are ignored.
//!
//! ```rust
//! use librtdb::registry::DeviceRegistry;
//!
//! let mut registry: DeviceRegistry = DeviceRegistry::new();
//! registry.register("lamp").unwrap();
//!
//! let updated = registry
//!     .poll(r#"{"lamp":{"state":true,"sliderValue":140}}"#)
//!     .unwrap();
//!
//! let lamp = registry.get("lamp").unwrap();
//! assert_eq!(updated, 1);
//! assert!(lamp.state());
//! assert_eq!(lamp.slider_value(), 100);
//! ```

#![deny(unsafe_code)]

use crate::network::application::http::NO_DATA;
use core::fmt;
use heapless::{String, Vec};
use serde::Deserialize;
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, Visitor};

/// Default registry capacity.
pub const MAX_DEVICES: usize = 16;
/// Longest device name.
pub const MAX_NAME_LEN: usize = 32;
/// Longest icon identifier.
pub const MAX_ICON_LEN: usize = 64;
/// Icon a freshly registered device shows.
pub const DEFAULT_ICON: &str = "icon1.png";
/// Largest slider value; updates are clamped to `0..=MAX_SLIDER_VALUE`.
pub const MAX_SLIDER_VALUE: u8 = 100;

/// Errors reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The document was empty or the store's "no data" sentinel.
    NoData,
    /// The document is not a JSON object of device entries that fits in memory.
    Parse,
    /// The registry has no free slot.
    Full,
    /// A device with this name is already registered.
    Duplicate,
    /// No device with this name is registered.
    NotFound,
    /// The name exceeds [`MAX_NAME_LEN`].
    NameTooLong,
}

#[cfg(feature = "defmt")]
impl defmt::Format for RegistryError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RegistryError::NoData => defmt::write!(f, "NoData"),
            RegistryError::Parse => defmt::write!(f, "Parse"),
            RegistryError::Full => defmt::write!(f, "Full"),
            RegistryError::Duplicate => defmt::write!(f, "Duplicate"),
            RegistryError::NotFound => defmt::write!(f, "NotFound"),
            RegistryError::NameTooLong => defmt::write!(f, "NameTooLong"),
        }
    }
}

/// A dashboard-controlled device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    name: String<MAX_NAME_LEN>,
    icon: String<MAX_ICON_LEN>,
    state: bool,
    slider_enabled: bool,
    slider_value: u8,
    order: i32,
}

impl Device {
    fn new(name: &str) -> Result<Self, RegistryError> {
        let mut icon = String::new();
        icon.push_str(DEFAULT_ICON)
            .map_err(|_| RegistryError::NameTooLong)?;
        Ok(Self {
            name: String::try_from(name).map_err(|_| RegistryError::NameTooLong)?,
            icon,
            state: false,
            slider_enabled: false,
            slider_value: MAX_SLIDER_VALUE,
            order: 0,
        })
    }

    /// Name the device is keyed by in the store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Icon identifier.
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// On/off state.
    pub fn state(&self) -> bool {
        self.state
    }

    /// Whether the dashboard shows a slider for this device.
    pub fn slider_enabled(&self) -> bool {
        self.slider_enabled
    }

    /// Slider position, `0..=100`.
    pub fn slider_value(&self) -> u8 {
        self.slider_value
    }

    /// Display order on the dashboard.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Truncates towards zero, then clamps to `0..=MAX_SLIDER_VALUE`.
    fn set_slider_value(&mut self, value: f32) {
        let value = value as i32;
        self.slider_value = value.clamp(0, i32::from(MAX_SLIDER_VALUE)) as u8;
    }

    fn apply(&mut self, patch: &DevicePatch) {
        if let Some(icon) = &patch.icon {
            self.icon = icon.clone();
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(enabled) = patch.slider_enabled {
            self.slider_enabled = enabled;
        }
        if let Some(value) = patch.slider_value {
            self.set_slider_value(value);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Properties present in one device entry of a polled document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DevicePatch {
    icon: Option<String<MAX_ICON_LEN>>,
    state: Option<bool>,
    slider_enabled: Option<bool>,
    // Any JSON number; dashboards may write fractional slider positions.
    slider_value: Option<f32>,
    order: Option<i32>,
}

/// Patches for registered devices, keyed by registry index.
type Patches<const N: usize> = Vec<(usize, DevicePatch), N>;

/// Walks a device document, decoding entries only for registered names.
///
/// Entries for other names are skipped unparsed, whatever their shape or
/// size, so the document may carry any number of unrelated siblings.
struct DocumentSeed<'r, const N: usize> {
    devices: &'r [Device],
}

impl<'de, const N: usize> DeserializeSeed<'de> for DocumentSeed<'_, N> {
    type Value = Patches<N>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, const N: usize> Visitor<'de> for DocumentSeed<'_, N> {
    type Value = Patches<N>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by device name")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut patches = Patches::new();
        while let Some(name) = map.next_key::<&'de str>()? {
            let Some(index) = self.devices.iter().position(|device| device.name() == name) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            let patch: DevicePatch = map.next_value()?;
            // A repeated name overrides the earlier entry.
            if let Some(slot) = patches.iter_mut().find(|(i, _)| *i == index) {
                slot.1 = patch;
            } else {
                patches
                    .push((index, patch))
                    .map_err(|_| <A::Error as de::Error>::custom("more entries than devices"))?;
            }
        }
        Ok(patches)
    }
}

/// An ordered, fixed-capacity set of devices owned by the application.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry<const N: usize = MAX_DEVICES> {
    devices: Vec<Device, N>,
}

impl<const N: usize> DeviceRegistry<N> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Registers a device with default properties.
    pub fn register(&mut self, name: &str) -> Result<&Device, RegistryError> {
        if self.position(name).is_some() {
            return Err(RegistryError::Duplicate);
        }
        let device = Device::new(name)?;
        self.devices
            .push(device)
            .map_err(|_| RegistryError::Full)?;
        debug!("registered device {}", name);
        self.devices.last().ok_or(RegistryError::Full)
    }

    /// Removes a device, keeping the order of the others.
    pub fn deregister(&mut self, name: &str) -> Result<Device, RegistryError> {
        let index = self.position(name).ok_or(RegistryError::NotFound)?;
        Ok(self.devices.remove(index))
    }

    /// Looks a device up by name.
    pub fn get(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.name() == name)
    }

    /// Devices in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether no device is registered.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Applies a store document to the registered devices.
    ///
    /// Returns how many registered devices had an entry in the document.
    /// Entries for unregistered names are ignored. Nothing is applied unless
    /// the whole document parses.
    pub fn poll(&mut self, document: &str) -> Result<usize, RegistryError> {
        if document.is_empty() || document == NO_DATA {
            debug!("no device document");
            return Err(RegistryError::NoData);
        }

        let mut deserializer = serde_json_core::de::Deserializer::new(document.as_bytes(), None);
        let patches = DocumentSeed::<N> {
            devices: &self.devices,
        }
        .deserialize(&mut deserializer)
        .and_then(|patches| deserializer.end().map(|_| patches))
        .map_err(|_| RegistryError::Parse)?;

        for (index, patch) in patches.iter() {
            if let Some(device) = self.devices.get_mut(*index) {
                device.apply(patch);
            }
        }
        let updated = patches.len();

        info!("device poll updated {} of {}", updated, self.devices.len());
        Ok(updated)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.devices.iter().position(|device| device.name() == name)
    }
}
