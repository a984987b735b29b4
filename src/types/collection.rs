use crate::types::addon::AddonEntry;
use serde::Serialize;

pub const COLLECTION_GET_TYPE: &str = "AddonCollectionGet";
pub const COLLECTION_SET_TYPE: &str = "AddonCollectionSet";

#[derive(Debug, Clone, Serialize)]
pub struct AddonCollectionGet<'a> {
    #[serde(rename = "type")]
    pub request_type: &'static str,
    #[serde(rename = "authKey")]
    pub auth_key: &'a str,
    pub update: bool,
}

impl<'a> AddonCollectionGet<'a> {
    pub fn new(auth_key: &'a str) -> Self {
        AddonCollectionGet {
            request_type: COLLECTION_GET_TYPE,
            auth_key,
            update: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddonCollectionSet<'a> {
    #[serde(rename = "type")]
    pub request_type: &'static str,
    #[serde(rename = "authKey")]
    pub auth_key: &'a str,
    pub addons: &'a [AddonEntry],
}

impl<'a> AddonCollectionSet<'a> {
    pub fn new(auth_key: &'a str, addons: &'a [AddonEntry]) -> Self {
        AddonCollectionSet {
            request_type: COLLECTION_SET_TYPE,
            auth_key,
            addons,
        }
    }
}
