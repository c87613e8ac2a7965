use crate::error::SdsResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Dictionary and JSON conversions shared by every SDS data-transfer object.
///
/// Keys follow the service's PascalCase names. Reading tolerates unknown keys
/// and an empty dictionary yields the default value.
pub trait SdsObject: Serialize + DeserializeOwned + Sized {
    /// Convert into a JSON dictionary
    fn to_dictionary(&self) -> SdsResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "expected a JSON object, got {}",
                other
            ))
            .into()),
        }
    }

    /// Build from a JSON dictionary
    fn from_dictionary(content: &Map<String, Value>) -> SdsResult<Self> {
        Ok(serde_json::from_value(Value::Object(content.clone()))?)
    }

    fn to_json(&self) -> SdsResult<String> {
        Ok(serde_json::to_string(&self.to_dictionary()?)?)
    }

    fn from_json(json: &str) -> SdsResult<Self> {
        let content: Map<String, Value> = serde_json::from_str(json)?;
        Self::from_dictionary(&content)
    }
}

/// Reads an optional list, treating `null` and `[]` as not set.
fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(items.filter(|items| !items.is_empty()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    kind: &'static str,
    value: u8,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// How SDS treats the boundaries of a requested index range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SdsBoundaryType {
    Exact,
    Inside,
    Outside,
    ExactOrCalculated,
}

impl SdsBoundaryType {
    /// Numeric value the service expects
    pub fn value(self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::Inside => 1,
            Self::Outside => 2,
            Self::ExactOrCalculated => 3,
        }
    }
}

impl From<SdsBoundaryType> for u8 {
    fn from(boundary: SdsBoundaryType) -> Self {
        boundary.value()
    }
}

impl TryFrom<u8> for SdsBoundaryType {
    type Error = UnknownVariant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Exact),
            1 => Ok(Self::Inside),
            2 => Ok(Self::Outside),
            3 => Ok(Self::ExactOrCalculated),
            _ => Err(UnknownVariant {
                kind: "boundary type",
                value,
            }),
        }
    }
}

/// Interpolation behaviour for reads between stored indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SdsInterpolationMode {
    #[default]
    Continuous,
    StepwiseContinuousLeading,
    StepwiseContinuousTrailing,
    Discrete,
    ContinuousNullableLeading,
    ContinuousNullableTrailing,
}

impl SdsInterpolationMode {
    pub fn value(self) -> u8 {
        match self {
            Self::Continuous => 0,
            Self::StepwiseContinuousLeading => 1,
            Self::StepwiseContinuousTrailing => 2,
            Self::Discrete => 3,
            Self::ContinuousNullableLeading => 4,
            Self::ContinuousNullableTrailing => 5,
        }
    }
}

impl From<SdsInterpolationMode> for u8 {
    fn from(mode: SdsInterpolationMode) -> Self {
        mode.value()
    }
}

impl TryFrom<u8> for SdsInterpolationMode {
    type Error = UnknownVariant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Continuous),
            1 => Ok(Self::StepwiseContinuousLeading),
            2 => Ok(Self::StepwiseContinuousTrailing),
            3 => Ok(Self::Discrete),
            4 => Ok(Self::ContinuousNullableLeading),
            5 => Ok(Self::ContinuousNullableTrailing),
            _ => Err(UnknownVariant {
                kind: "interpolation mode",
                value,
            }),
        }
    }
}

/// SDS type code. Codes this crate has no constant for are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SdsTypeCode(pub u16);

impl SdsTypeCode {
    pub const EMPTY: Self = Self(0);
    pub const OBJECT: Self = Self(1);
    pub const DB_NULL: Self = Self(2);
    pub const BOOLEAN: Self = Self(3);
    pub const CHAR: Self = Self(4);
    pub const SBYTE: Self = Self(5);
    pub const BYTE: Self = Self(6);
    pub const INT16: Self = Self(7);
    pub const UINT16: Self = Self(8);
    pub const INT32: Self = Self(9);
    pub const UINT32: Self = Self(10);
    pub const INT64: Self = Self(11);
    pub const UINT64: Self = Self(12);
    pub const SINGLE: Self = Self(13);
    pub const DOUBLE: Self = Self(14);
    pub const DECIMAL: Self = Self(15);
    pub const DATE_TIME: Self = Self(16);
    pub const STRING: Self = Self(18);
    pub const GUID: Self = Self(19);
    pub const DATE_TIME_OFFSET: Self = Self(20);
    pub const TIME_SPAN: Self = Self(21);
    pub const VERSION: Self = Self(22);
}

/// Property of an SDS type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsTypeProperty {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sds_type: Option<Box<SdsType>>,
    pub is_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolation_mode: Option<SdsInterpolationMode>,
}

impl SdsTypeProperty {
    pub fn new(id: impl Into<String>, sds_type: SdsType) -> Self {
        Self {
            id: Some(id.into()),
            sds_type: Some(Box::new(sds_type)),
            ..Self::default()
        }
    }

    /// Mark this property as (part of) the type's index
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }
}

/// SDS type definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsType {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sds_type_code: SdsTypeCode,
    #[serde(deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<SdsTypeProperty>>,
}

impl SdsType {
    /// Unnamed primitive type, as used for property types
    pub fn primitive(code: SdsTypeCode) -> Self {
        Self {
            sds_type_code: code,
            ..Self::default()
        }
    }

    /// Compound type built from the given properties
    pub fn object(id: impl Into<String>, properties: Vec<SdsTypeProperty>) -> Self {
        Self {
            id: Some(id.into()),
            sds_type_code: SdsTypeCode::OBJECT,
            properties: Some(properties).filter(|p| !p.is_empty()),
            ..Self::default()
        }
    }
}

/// Secondary index on a stream
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsStreamIndex {
    pub sds_type_property_id: Option<String>,
}

impl SdsStreamIndex {
    pub fn new(sds_type_property_id: impl Into<String>) -> Self {
        Self {
            sds_type_property_id: Some(sds_type_property_id.into()),
        }
    }
}

/// Per-stream override of a type property's behaviour
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsStreamPropertyOverride {
    pub sds_type_property_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolation_mode: Option<SdsInterpolationMode>,
}

/// Stream definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsStream {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub type_id: Option<String>,
    #[serde(deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<SdsStreamIndex>>,
    #[serde(deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub property_overrides: Option<Vec<SdsStreamPropertyOverride>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolation_mode: Option<SdsInterpolationMode>,
}

impl SdsStream {
    pub fn new(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            type_id: Some(type_id.into()),
            ..Self::default()
        }
    }
}

/// Explicit source-to-target property mapping within a stream view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsStreamViewProperty {
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sds_stream_view: Option<Box<SdsStreamView>>,
}

impl SdsStreamViewProperty {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: Some(source_id.into()),
            target_id: Some(target_id.into()),
            sds_stream_view: None,
        }
    }
}

/// Stream view: reads a stream of one type as another type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsStreamView {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_type_id: Option<String>,
    pub target_type_id: Option<String>,
    #[serde(deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<SdsStreamViewProperty>>,
}

impl SdsStreamView {
    pub fn new(
        id: impl Into<String>,
        source_type_id: impl Into<String>,
        target_type_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            source_type_id: Some(source_type_id.into()),
            target_type_id: Some(target_type_id.into()),
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: Vec<SdsStreamViewProperty>) -> Self {
        self.properties = Some(properties).filter(|p| !p.is_empty());
        self
    }
}

/// Bit flags describing what a stream view map entry does to a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SdsStreamViewMode(pub u32);

impl SdsStreamViewMode {
    pub const NONE: Self = Self(0);
    pub const FIELD_ADD: Self = Self(1);
    pub const FIELD_REMOVE: Self = Self(2);
    pub const FIELD_RENAME: Self = Self(4);
    pub const FIELD_MOVE: Self = Self(8);
    pub const FIELD_CONVERSION: Self = Self(16);
    pub const INVALID_FIELD_CONVERSION: Self = Self(32);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for SdsStreamViewMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One resolved property mapping of a stream view map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsStreamViewMapProperty {
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub mode: SdsStreamViewMode,
}

/// Resolved mapping from a source type to a target type, as computed by the
/// service for a stream view.
///
/// `SourceTypeId` and `TargetTypeId` are always written, as `null` when unset.
/// `Properties` is written only when set and is never an empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsStreamViewMap {
    pub source_type_id: Option<String>,
    pub target_type_id: Option<String>,
    #[serde(deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<SdsStreamViewMapProperty>>,
}

impl SdsStreamViewMap {
    pub fn new(source_type_id: impl Into<String>, target_type_id: impl Into<String>) -> Self {
        Self {
            source_type_id: Some(source_type_id.into()),
            target_type_id: Some(target_type_id.into()),
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: Vec<SdsStreamViewMapProperty>) -> Self {
        self.properties = Some(properties).filter(|p| !p.is_empty());
        self
    }

    pub fn source_type_id(&self) -> Option<&str> {
        self.source_type_id.as_deref()
    }

    pub fn target_type_id(&self) -> Option<&str> {
        self.target_type_id.as_deref()
    }

    pub fn properties(&self) -> Option<&[SdsStreamViewMapProperty]> {
        self.properties.as_deref()
    }
}

/// Error body returned by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SdsErrorResponse {
    pub operation_id: Option<String>,
    pub error: Option<String>,
    pub reason: Option<String>,
    pub resolution: Option<String>,
}

impl SdsErrorResponse {
    /// Human-readable summary, if the body carried one
    pub fn summary(&self) -> Option<String> {
        match (&self.error, &self.reason) {
            (Some(error), Some(reason)) => Some(format!("{} {}", error, reason)),
            (Some(error), None) => Some(error.clone()),
            (None, Some(reason)) => Some(reason.clone()),
            (None, None) => None,
        }
    }
}

impl SdsObject for SdsTypeProperty {}
impl SdsObject for SdsType {}
impl SdsObject for SdsStreamIndex {}
impl SdsObject for SdsStreamPropertyOverride {}
impl SdsObject for SdsStream {}
impl SdsObject for SdsStreamViewProperty {}
impl SdsObject for SdsStreamView {}
impl SdsObject for SdsStreamViewMapProperty {}
impl SdsObject for SdsStreamViewMap {}
