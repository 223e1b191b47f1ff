//! geosite.dat Wire Messages
//!
//! Field numbers follow the v2fly `routercommon` proto. The domain type is
//! kept as its raw integer so codes unknown to this build survive decoding.

/// Top-level message of a geosite.dat file.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GeoSiteList {
    #[prost(message, repeated, tag = "1")]
    pub entry: Vec<GeoSite>,
}

/// One category.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GeoSite {
    /// Category tag (historically a country code)
    #[prost(string, tag = "1")]
    pub country_code: String,
    #[prost(message, repeated, tag = "2")]
    pub domain: Vec<Domain>,
    #[prost(bytes = "vec", tag = "3")]
    pub resource_hash: Vec<u8>,
    #[prost(string, tag = "4")]
    pub code: String,
}

/// One domain rule.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Domain {
    /// Plain=0, Regex=1, Domain=2, Full=3
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub value: String,
    #[prost(message, repeated, tag = "3")]
    pub attribute: Vec<Attribute>,
}

/// Rule attribute. Only the key takes part in selectors.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Attribute {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(oneof = "attribute::TypedValue", tags = "2, 3")]
    pub typed_value: Option<attribute::TypedValue>,
}

pub mod attribute {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum TypedValue {
        #[prost(bool, tag = "2")]
        BoolValue(bool),
        #[prost(int64, tag = "3")]
        IntValue(i64),
    }
}
