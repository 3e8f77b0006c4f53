//! Request validation: untrusted JSON, path and query input in, typed requests out.
//!
//! Every operation collects all violations before failing, so a client sees
//! each bad field in a single response.

use crate::semaphore::calls::DURATION_REQUIRES_ADMIN;
use ethers::types::U256;
use semaphore_types::{
    parse_uint, AddMemberRequest, AddMembersRequest, CreateGroupRequest, FieldViolation,
    GatewayError, GatewayResult, HexAddress, MemberQuery, ProofRequest, RemoveMemberRequest,
    SemaphoreProof, UpdateGroupAdminRequest, UpdateMemberRequest, UpdateMerkleTreeDurationRequest,
    PROOF_POINTS,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const REQUIRED: &str = "Required";
pub const EXPECTED_STRING: &str = "Expected a decimal string";
pub const EXPECTED_ADDRESS: &str = "Expected an address string";
pub const EXPECTED_ARRAY: &str = "Expected an array";
pub const EXPECTED_OBJECT: &str = "Expected an object";

pub type JsonBody = Map<String, Value>;

/// Parses a request body; an empty body counts as `{}`.
pub fn parse_body(bytes: &[u8]) -> GatewayResult<JsonBody> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GatewayError::invalid_field("body", "Expected a JSON object")),
        Err(e) => Err(GatewayError::invalid_field("body", format!("Malformed JSON: {}", e))),
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn uint_text(&mut self, field: &str, value: Option<&str>) -> Option<U256> {
        match value {
            None => {
                self.reject(field, REQUIRED);
                None
            }
            Some(text) => match parse_uint(text) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    self.reject(field, e.to_string());
                    None
                }
            },
        }
    }

    pub fn uint(&mut self, field: &str, value: Option<&Value>) -> Option<U256> {
        match present(value) {
            None => self.uint_text(field, None),
            Some(Value::String(text)) => self.uint_text(field, Some(text)),
            Some(_) => {
                self.reject(field, EXPECTED_STRING);
                None
            }
        }
    }

    pub fn optional_uint(&mut self, field: &str, value: Option<&Value>) -> Option<U256> {
        present(value).and_then(|v| self.uint(field, Some(v)))
    }

    pub fn address(&mut self, field: &str, value: Option<&Value>) -> Option<HexAddress> {
        match present(value) {
            None => {
                self.reject(field, REQUIRED);
                None
            }
            Some(Value::String(text)) => match HexAddress::parse(text) {
                Ok(address) => Some(address),
                Err(e) => {
                    self.reject(field, format!("Invalid address: {}", e));
                    None
                }
            },
            Some(_) => {
                self.reject(field, EXPECTED_ADDRESS);
                None
            }
        }
    }

    pub fn optional_address(&mut self, field: &str, value: Option<&Value>) -> Option<HexAddress> {
        present(value).and_then(|v| self.address(field, Some(v)))
    }

    /// Validates each element as `field.<index>`, keeping the received order.
    pub fn uint_list(&mut self, field: &str, value: Option<&Value>, min_len: usize) -> Option<Vec<U256>> {
        let items = match present(value) {
            None => {
                self.reject(field, REQUIRED);
                return None;
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.reject(field, EXPECTED_ARRAY);
                return None;
            }
        };

        if items.len() < min_len {
            self.reject(field, format!("Must contain at least {} item(s)", min_len));
            return None;
        }

        let parsed: Vec<Option<U256>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.uint(&format!("{}.{}", field, i), Some(item)))
            .collect();
        parsed.into_iter().collect()
    }

    pub fn proof(&mut self, field: &str, value: Option<&Value>) -> Option<SemaphoreProof> {
        let proof = match present(value) {
            None => {
                self.reject(field, REQUIRED);
                return None;
            }
            Some(Value::Object(proof)) => proof,
            Some(_) => {
                self.reject(field, EXPECTED_OBJECT);
                return None;
            }
        };

        let mut scalar = |name: &str| self.uint(&format!("{}.{}", field, name), proof.get(name));
        let merkle_tree_depth = scalar("merkleTreeDepth");
        let merkle_tree_root = scalar("merkleTreeRoot");
        let nullifier = scalar("nullifier");
        let message = scalar("message");
        let scope = scalar("scope");

        let points_field = format!("{}.points", field);
        let points = match proof.get("points") {
            Some(Value::Array(items)) if items.len() != PROOF_POINTS => {
                self.reject(points_field, format!("Must contain exactly {} points", PROOF_POINTS));
                None
            }
            other => self
                .uint_list(&points_field, other, PROOF_POINTS)
                .and_then(|points| <[U256; PROOF_POINTS]>::try_from(points).ok()),
        };

        Some(SemaphoreProof {
            merkle_tree_depth: merkle_tree_depth?,
            merkle_tree_root: merkle_tree_root?,
            nullifier: nullifier?,
            message: message?,
            scope: scope?,
            points: points?,
        })
    }

    /// Fails with every collected violation, or builds the request.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> GatewayResult<T> {
        if !self.violations.is_empty() {
            return Err(GatewayError::Validation(self.violations));
        }
        build().ok_or_else(|| GatewayError::Internal("Validator accepted an incomplete request".into()))
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

pub fn group_id(raw: &str) -> GatewayResult<U256> {
    let mut v = Validator::new();
    let group_id = v.uint_text("groupId", Some(raw));
    v.finish(|| group_id)
}

pub fn create_group(body: &JsonBody) -> GatewayResult<CreateGroupRequest> {
    let mut v = Validator::new();
    let admin = v.optional_address("admin", body.get("admin"));
    let merkle_tree_duration = v.optional_uint("merkleTreeDuration", body.get("merkleTreeDuration"));

    if merkle_tree_duration.is_some() && admin.is_none() && !v.has_violation("admin") {
        v.reject("merkleTreeDuration", DURATION_REQUIRES_ADMIN);
    }

    v.finish(|| {
        Some(CreateGroupRequest {
            admin,
            merkle_tree_duration,
        })
    })
}

pub fn update_group_admin(raw_group_id: &str, body: &JsonBody) -> GatewayResult<UpdateGroupAdminRequest> {
    let mut v = Validator::new();
    let group_id = v.uint_text("groupId", Some(raw_group_id));
    let new_admin = v.address("newAdmin", body.get("newAdmin"));

    v.finish(|| {
        Some(UpdateGroupAdminRequest {
            group_id: group_id?,
            new_admin: new_admin?,
        })
    })
}

pub fn update_merkle_tree_duration(
    raw_group_id: &str,
    body: &JsonBody,
) -> GatewayResult<UpdateMerkleTreeDurationRequest> {
    let mut v = Validator::new();
    let group_id = v.uint_text("groupId", Some(raw_group_id));
    let duration = v.uint("newMerkleTreeDuration", body.get("newMerkleTreeDuration"));

    v.finish(|| {
        Some(UpdateMerkleTreeDurationRequest {
            group_id: group_id?,
            new_merkle_tree_duration: duration?,
        })
    })
}

pub fn add_member(body: &JsonBody) -> GatewayResult<AddMemberRequest> {
    let mut v = Validator::new();
    let group_id = v.uint("groupId", body.get("groupId"));
    let identity_commitment = v.uint("identityCommitment", body.get("identityCommitment"));

    v.finish(|| {
        Some(AddMemberRequest {
            group_id: group_id?,
            identity_commitment: identity_commitment?,
        })
    })
}

pub fn add_members(body: &JsonBody) -> GatewayResult<AddMembersRequest> {
    let mut v = Validator::new();
    let group_id = v.uint("groupId", body.get("groupId"));
    let identity_commitments = v.uint_list("identityCommitments", body.get("identityCommitments"), 1);

    v.finish(|| {
        Some(AddMembersRequest {
            group_id: group_id?,
            identity_commitments: identity_commitments?,
        })
    })
}

pub fn remove_member(body: &JsonBody) -> GatewayResult<RemoveMemberRequest> {
    let mut v = Validator::new();
    let group_id = v.uint("groupId", body.get("groupId"));
    let identity_commitment = v.uint("identityCommitment", body.get("identityCommitment"));
    let siblings = v.uint_list("merkleProofSiblings", body.get("merkleProofSiblings"), 0);

    v.finish(|| {
        Some(RemoveMemberRequest {
            group_id: group_id?,
            identity_commitment: identity_commitment?,
            merkle_proof_siblings: siblings?,
        })
    })
}

pub fn update_member(body: &JsonBody) -> GatewayResult<UpdateMemberRequest> {
    let mut v = Validator::new();
    let group_id = v.uint("groupId", body.get("groupId"));
    let identity_commitment = v.uint("identityCommitment", body.get("identityCommitment"));
    let new_identity_commitment = v.uint("newIdentityCommitment", body.get("newIdentityCommitment"));
    let siblings = v.uint_list("merkleProofSiblings", body.get("merkleProofSiblings"), 0);

    v.finish(|| {
        Some(UpdateMemberRequest {
            group_id: group_id?,
            identity_commitment: identity_commitment?,
            new_identity_commitment: new_identity_commitment?,
            merkle_proof_siblings: siblings?,
        })
    })
}

pub fn proof_request(body: &JsonBody) -> GatewayResult<ProofRequest> {
    let mut v = Validator::new();
    let group_id = v.uint("groupId", body.get("groupId"));
    let proof = v.proof("proof", body.get("proof"));

    v.finish(|| {
        Some(ProofRequest {
            group_id: group_id?,
            proof: proof?,
        })
    })
}

pub fn member_query(params: &HashMap<String, String>) -> GatewayResult<MemberQuery> {
    let mut v = Validator::new();
    let group_id = v.uint_text("groupId", params.get("groupId").map(String::as_str));
    let identity_commitment =
        v.uint_text("identityCommitment", params.get("identityCommitment").map(String::as_str));

    v.finish(|| {
        Some(MemberQuery {
            group_id: group_id?,
            identity_commitment: identity_commitment?,
        })
    })
}
