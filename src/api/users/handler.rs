use super::error::*;
use crate::application_port::{BuddyService, UserService};
use crate::domain_model::{CourseId, UserId};
use serde::Deserialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingQuery {
    pub pairing_enabled: bool,
}

pub async fn get_self(
    me: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let view = user_service
        .get_self(me)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&view))
}

pub async fn get_user(
    user_id: i64,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let view = user_service
        .get_user(UserId(user_id))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&view))
}

pub async fn update_pairing_enabled(
    query: PairingQuery,
    me: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    user_service
        .set_pairing_enabled(me, query.pairing_enabled)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(StatusCode::OK)
}

pub async fn list_buddies(
    me: UserId,
    buddy_service: Arc<dyn BuddyService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let buddies = buddy_service
        .list_buddies(me)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&buddies))
}

pub async fn list_buddies_in_course(
    course_id: i64,
    me: UserId,
    buddy_service: Arc<dyn BuddyService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let buddies = buddy_service
        .list_buddies_in_course(me, CourseId(course_id))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&buddies))
}

pub async fn list_blocked(
    me: UserId,
    buddy_service: Arc<dyn BuddyService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let blocked = buddy_service
        .list_blocked(me)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&blocked))
}

pub async fn add_buddy(
    other: i64,
    me: UserId,
    buddy_service: Arc<dyn BuddyService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    buddy_service
        .add_buddy(me, UserId(other))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(StatusCode::OK)
}

pub async fn remove_buddy(
    other: i64,
    me: UserId,
    buddy_service: Arc<dyn BuddyService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    buddy_service
        .remove_buddy(me, UserId(other))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(StatusCode::OK)
}

pub async fn block(
    other: i64,
    me: UserId,
    buddy_service: Arc<dyn BuddyService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    buddy_service
        .block(me, UserId(other))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(StatusCode::OK)
}

pub async fn unblock(
    other: i64,
    me: UserId,
    buddy_service: Arc<dyn BuddyService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    buddy_service
        .unblock(me, UserId(other))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    Ok(StatusCode::OK)
}
