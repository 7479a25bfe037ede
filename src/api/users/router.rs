use super::error::*;
use super::handler;
use crate::domain_model::UserId;
use crate::domain_port::SessionStore;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

/// Cookie holding the session id issued by the authentication service.
pub const SESSION_COOKIE: &str = "SESSION";

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let session = with_session(server.session_store.clone());

    let get_self = warp::path("users")
        .and(warp::path::end())
        .and(warp::get())
        .and(session.clone())
        .and(with(server.user_service.clone()))
        .and_then(handler::get_self);

    let get_user = warp::path("users")
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with(server.user_service.clone()))
        .and_then(handler::get_user);

    let update_pairing = warp::path("users")
        .and(warp::path::end())
        .and(warp::put())
        .and(warp::query::<handler::PairingQuery>())
        .and(session.clone())
        .and(with(server.user_service.clone()))
        .and_then(handler::update_pairing_enabled);

    let list_buddies = warp::path!("users" / "buddy")
        .and(warp::get())
        .and(session.clone())
        .and(with(server.buddy_service.clone()))
        .and_then(handler::list_buddies);

    let list_in_course = warp::path!("users" / "buddy" / "course" / i64)
        .and(warp::get())
        .and(session.clone())
        .and(with(server.buddy_service.clone()))
        .and_then(handler::list_buddies_in_course);

    let list_blocked = warp::path!("users" / "buddy" / "blocked")
        .and(warp::get())
        .and(session.clone())
        .and(with(server.buddy_service.clone()))
        .and_then(handler::list_blocked);

    let add_buddy = warp::path!("users" / "buddy" / i64)
        .and(warp::post())
        .and(session.clone())
        .and(with(server.buddy_service.clone()))
        .and_then(handler::add_buddy);

    let remove_buddy = warp::path!("users" / "buddy" / i64)
        .and(warp::delete())
        .and(session.clone())
        .and(with(server.buddy_service.clone()))
        .and_then(handler::remove_buddy);

    let block = warp::path!("users" / "buddy" / i64 / "block")
        .and(warp::post())
        .and(session.clone())
        .and(with(server.buddy_service.clone()))
        .and_then(handler::block);

    let unblock = warp::path!("users" / "buddy" / i64 / "block")
        .and(warp::delete())
        .and(session)
        .and(with(server.buddy_service.clone()))
        .and_then(handler::unblock);

    get_self
        .or(get_user)
        .or(update_pairing)
        .or(list_buddies)
        .or(list_in_course)
        .or(list_blocked)
        .or(add_buddy)
        .or(remove_buddy)
        .or(block)
        .or(unblock)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Resolves the caller from the session cookie, rejecting before any handler runs.
fn with_session(
    session_store: Arc<dyn SessionStore>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE).and_then(move |session: Option<String>| {
        let session_store = session_store.clone();
        async move {
            let Some(session) = session else {
                return Err(reject::custom(ApiErrorCode::Unauthenticated));
            };
            match session_store.resolve(&session).await {
                Ok(Some(user_id)) => Ok(user_id),
                Ok(None) => Err(reject::custom(ApiErrorCode::Unauthenticated)),
                Err(e) => Err(reject::custom(ApiErrorCode::internal(e))),
            }
        }
    })
}
