use foundation::LonLat;
use serde_json::{Map, Value};

/// Descriptive properties of a feature.
///
/// The three named fields are required on the wire; anything else the service
/// sends is kept in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureProperties {
    /// Display title. Also the identity key used for selection matching.
    pub place_name: String,
    pub city: String,
    pub entity_type: String,
    pub extra: Map<String, Value>,
}

/// One geolocated entity returned by the answering service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub position: LonLat,
    pub properties: FeatureProperties,
}

/// Text shown when a map marker is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPopup {
    pub title: String,
    pub city_line: String,
    pub type_line: String,
}

impl GeoFeature {
    pub fn new(
        position: LonLat,
        place_name: impl Into<String>,
        city: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            position,
            properties: FeatureProperties {
                place_name: place_name.into(),
                city: city.into(),
                entity_type: entity_type.into(),
                extra: Map::new(),
            },
        }
    }

    pub fn place_name(&self) -> &str {
        &self.properties.place_name
    }

    /// Identity comparison used by selection: `place_name` equality only.
    ///
    /// Two features sharing a `place_name` compare equal here even when their
    /// coordinates differ.
    pub fn same_place(&self, other: &GeoFeature) -> bool {
        self.properties.place_name == other.properties.place_name
    }

    pub fn popup(&self) -> MarkerPopup {
        MarkerPopup {
            title: self.properties.place_name.clone(),
            city_line: format!("City: {}", self.properties.city),
            type_line: format!("Type: {}", self.properties.entity_type),
        }
    }

    /// Decodes a single GeoJSON-like feature object.
    pub fn from_value(value: &Value) -> Result<Self, FeatureDecodeError> {
        let obj = value.as_object().ok_or(FeatureDecodeError::NotAnObject)?;

        let coords = obj
            .get("geometry")
            .and_then(|g| g.as_object())
            .ok_or(FeatureDecodeError::MissingGeometry)?
            .get("coordinates")
            .and_then(|c| c.as_array())
            .ok_or(FeatureDecodeError::MissingGeometry)?;
        let position = parse_position(coords)?;

        let props = obj
            .get("properties")
            .and_then(|p| p.as_object())
            .ok_or(FeatureDecodeError::MissingProperties)?;

        let mut extra = props.clone();
        let place_name = take_required_str(&mut extra, "place_name")?;
        let city = take_required_str(&mut extra, "city")?;
        let entity_type = take_required_str(&mut extra, "entity_type")?;

        Ok(Self {
            position,
            properties: FeatureProperties {
                place_name,
                city,
                entity_type,
                extra,
            },
        })
    }
}

fn parse_position(coords: &[Value]) -> Result<LonLat, FeatureDecodeError> {
    let [lon, lat] = coords else {
        return Err(FeatureDecodeError::CoordinateArity(coords.len()));
    };
    let lon = lon.as_f64().ok_or(FeatureDecodeError::NonNumericCoordinate)?;
    let lat = lat.as_f64().ok_or(FeatureDecodeError::NonNumericCoordinate)?;
    LonLat::try_new(lon, lat).map_err(|e| FeatureDecodeError::InvalidCoordinate(e.to_string()))
}

fn take_required_str(
    props: &mut Map<String, Value>,
    key: &'static str,
) -> Result<String, FeatureDecodeError> {
    match props.remove(key) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(FeatureDecodeError::MissingProperty(key)),
    }
}

/// Why a single payload element was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureDecodeError {
    NotAnObject,
    MissingGeometry,
    CoordinateArity(usize),
    NonNumericCoordinate,
    InvalidCoordinate(String),
    MissingProperties,
    MissingProperty(&'static str),
}

impl std::fmt::Display for FeatureDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureDecodeError::NotAnObject => write!(f, "feature must be an object"),
            FeatureDecodeError::MissingGeometry => {
                write!(f, "feature missing geometry.coordinates")
            }
            FeatureDecodeError::CoordinateArity(n) => {
                write!(f, "expected 2 coordinates, found {n}")
            }
            FeatureDecodeError::NonNumericCoordinate => write!(f, "coordinate is not a number"),
            FeatureDecodeError::InvalidCoordinate(reason) => write!(f, "{reason}"),
            FeatureDecodeError::MissingProperties => write!(f, "feature missing properties"),
            FeatureDecodeError::MissingProperty(key) => {
                write!(f, "property `{key}` missing or not a string")
            }
        }
    }
}

impl std::error::Error for FeatureDecodeError {}

/// An element that was dropped during decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedFeature {
    pub index: usize,
    pub reason: FeatureDecodeError,
}

/// Result of decoding a payload array: the valid features, in order, plus a
/// record of everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFeatures {
    pub features: Vec<GeoFeature>,
    pub dropped: Vec<DroppedFeature>,
}

/// Decodes every element independently; malformed elements are dropped rather
/// than failing the whole set.
pub fn decode_features(values: &[Value]) -> DecodedFeatures {
    let mut out = DecodedFeatures {
        features: Vec::with_capacity(values.len()),
        dropped: Vec::new(),
    };
    for (index, value) in values.iter().enumerate() {
        match GeoFeature::from_value(value) {
            Ok(feature) => out.features.push(feature),
            Err(reason) => out.dropped.push(DroppedFeature { index, reason }),
        }
    }
    out
}
