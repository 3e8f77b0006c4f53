use super::envelope::Envelope;
use super::error::ApiError;
use super::responses::*;
use super::server::AppState;
use super::validation::{self, parse_body};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use semaphore_types::{render_uint, render_uints, GatewayError};
use std::collections::HashMap;

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

pub async fn health(State(state): State<AppState>) -> ApiResult<HealthData> {
    Ok(Envelope::ok(HealthData {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError(GatewayError::domain(404, "Route not found"))
}

pub async fn create_group(State(state): State<AppState>, body: Bytes) -> ApiResult<CreateGroupData> {
    let req = validation::create_group(&parse_body(&body)?)?;
    let created = state.service.create_group(&req).await?;

    Ok(Envelope::created(CreateGroupData::new(
        &created,
        req.admin,
        req.merkle_tree_duration,
    )))
}

pub async fn group_counter(State(state): State<AppState>) -> ApiResult<GroupCounterData> {
    let counter = state.service.group_counter().await?;
    Ok(Envelope::ok(GroupCounterData::new(counter)))
}

pub async fn group_info(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<GroupInfoData> {
    let group_id = validation::group_id(&group_id)?;
    let info = state.service.get_group_info(group_id).await?;
    Ok(Envelope::ok(GroupInfoData::from(info)))
}

pub async fn accept_group_admin(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<GroupTransactionData> {
    let group_id = validation::group_id(&group_id)?;
    let tx = state.service.accept_group_admin(group_id).await?;

    Ok(Envelope::written(
        StatusCode::OK,
        &tx,
        GroupTransactionData {
            group_id: render_uint(&group_id),
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn update_group_admin(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    body: Bytes,
) -> ApiResult<GroupAdminData> {
    let req = validation::update_group_admin(&group_id, &parse_body(&body)?)?;
    let tx = state.service.update_group_admin(&req).await?;

    Ok(Envelope::written(
        StatusCode::OK,
        &tx,
        GroupAdminData {
            group_id: render_uint(&req.group_id),
            new_admin: req.new_admin,
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn update_merkle_tree_duration(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    body: Bytes,
) -> ApiResult<MerkleTreeDurationData> {
    let req = validation::update_merkle_tree_duration(&group_id, &parse_body(&body)?)?;
    let tx = state.service.update_merkle_tree_duration(&req).await?;

    Ok(Envelope::written(
        StatusCode::OK,
        &tx,
        MerkleTreeDurationData {
            group_id: render_uint(&req.group_id),
            new_merkle_tree_duration: render_uint(&req.new_merkle_tree_duration),
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn add_member(State(state): State<AppState>, body: Bytes) -> ApiResult<MemberData> {
    let req = validation::add_member(&parse_body(&body)?)?;
    let tx = state.service.add_member(&req).await?;

    Ok(Envelope::written(
        StatusCode::CREATED,
        &tx,
        MemberData {
            group_id: render_uint(&req.group_id),
            identity_commitment: render_uint(&req.identity_commitment),
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn add_members(State(state): State<AppState>, body: Bytes) -> ApiResult<MembersData> {
    let req = validation::add_members(&parse_body(&body)?)?;
    let tx = state.service.add_members(&req).await?;

    Ok(Envelope::written(
        StatusCode::CREATED,
        &tx,
        MembersData {
            group_id: render_uint(&req.group_id),
            count: req.identity_commitments.len(),
            identity_commitments: render_uints(&req.identity_commitments),
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn remove_member(State(state): State<AppState>, body: Bytes) -> ApiResult<MemberData> {
    let req = validation::remove_member(&parse_body(&body)?)?;
    let tx = state.service.remove_member(&req).await?;

    Ok(Envelope::written(
        StatusCode::OK,
        &tx,
        MemberData {
            group_id: render_uint(&req.group_id),
            identity_commitment: render_uint(&req.identity_commitment),
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn update_member(State(state): State<AppState>, body: Bytes) -> ApiResult<UpdatedMemberData> {
    let req = validation::update_member(&parse_body(&body)?)?;
    let tx = state.service.update_member(&req).await?;

    Ok(Envelope::written(
        StatusCode::OK,
        &tx,
        UpdatedMemberData {
            group_id: render_uint(&req.group_id),
            old_identity_commitment: render_uint(&req.identity_commitment),
            new_identity_commitment: render_uint(&req.new_identity_commitment),
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn has_member(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<HasMemberData> {
    let query = validation::member_query(&params)?;
    let has_member = state.service.has_member(&query).await?;

    Ok(Envelope::ok(HasMemberData {
        group_id: render_uint(&query.group_id),
        identity_commitment: render_uint(&query.identity_commitment),
        has_member,
    }))
}

pub async fn index_of(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<IndexOfData> {
    let query = validation::member_query(&params)?;
    let index = state.service.index_of(&query).await?;

    Ok(Envelope::ok(IndexOfData {
        group_id: render_uint(&query.group_id),
        identity_commitment: render_uint(&query.identity_commitment),
        index: render_uint(&index),
    }))
}

pub async fn validate_proof(State(state): State<AppState>, body: Bytes) -> ApiResult<ValidatedProofData> {
    let req = validation::proof_request(&parse_body(&body)?)?;
    let tx = state.service.validate_proof(&req).await?;

    Ok(Envelope::written(
        StatusCode::OK,
        &tx,
        ValidatedProofData {
            group_id: render_uint(&req.group_id),
            proof: ProofSummary::from(&req.proof),
            transaction: TransactionView::from(&tx),
        },
    ))
}

pub async fn verify_proof(State(state): State<AppState>, body: Bytes) -> ApiResult<VerifiedProofData> {
    let req = validation::proof_request(&parse_body(&body)?)?;
    let is_valid = state.service.verify_proof(&req).await?;

    Ok(Envelope::ok(VerifiedProofData {
        group_id: render_uint(&req.group_id),
        is_valid,
        proof: ProofSummary::from(&req.proof),
    }))
}

pub async fn verifier(State(state): State<AppState>) -> ApiResult<VerifierData> {
    let verifier_address = state.service.verifier().await?;
    Ok(Envelope::ok(VerifierData { verifier_address }))
}

pub async fn account(State(state): State<AppState>) -> ApiResult<AccountData> {
    let overview = state.service.account_overview().await?;
    Ok(Envelope::ok(AccountData::from(overview)))
}
