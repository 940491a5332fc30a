//! 路由注册
//! 两个服务各自的路由表，以及共用的中间件栈

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::{
    auth::auth_gate_middleware,
    handlers::{self, MessageState, PetState},
    middleware::{build_cors_layer, panic_response, request_logging_middleware, AppState},
    repository::Repository,
};

/// 同时注册 `path` 与 `path/`，末尾斜杠可选
fn route_with_slash<S>(router: Router<S>, path: &str, method_router: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// 两个服务都有的端点：健康检查与认证
fn common_routes<R>() -> Router<Arc<AppState<R>>>
where
    R: Repository + ?Sized + 'static,
{
    let router = Router::new();
    let router = route_with_slash(router, "/health", get(handlers::health::health_check));
    let router = route_with_slash(router, "/ready", get(handlers::health::readiness_check::<R>));
    let router = route_with_slash(router, "/login", post(handlers::auth::login::<R>));
    let router = route_with_slash(router, "/refresh", post(handlers::auth::refresh::<R>));
    route_with_slash(router, "/protected", get(handlers::auth::protected))
}

/// pet-service 路由
pub fn pet_router(state: PetState) -> Router {
    use handlers::pets;

    let router = common_routes();
    let router = route_with_slash(
        router,
        "/api/v1/pets",
        get(pets::list_pets).post(pets::create_pet),
    );
    let router = route_with_slash(
        router,
        "/api/v1/pets/delete/all",
        axum::routing::delete(pets::delete_all_pets),
    );
    let router = route_with_slash(
        router,
        "/api/v1/pets/breeders/{breeder_id}",
        get(pets::list_pets_by_breeder),
    );
    let router = route_with_slash(
        router,
        "/api/v1/pets/{id}",
        get(pets::get_pet)
            .put(pets::update_pet)
            .delete(pets::delete_pet),
    );

    apply_middleware(router, state)
}

/// message-service 路由
pub fn message_router(state: MessageState) -> Router {
    use handlers::messages;

    let router = common_routes();
    let router = route_with_slash(
        router,
        "/api/v1/messages",
        get(messages::list_messages).post(messages::create_message),
    );
    let router = route_with_slash(
        router,
        "/api/v1/messages/{id}",
        get(messages::get_message)
            .put(messages::update_message)
            .delete(messages::delete_message),
    );

    apply_middleware(router, state)
}

/// 中间件栈，由外到内：CORS -> 请求日志 -> 认证闸门 -> panic 兜底 -> handler
pub fn apply_middleware<R>(router: Router<Arc<AppState<R>>>, state: Arc<AppState<R>>) -> Router
where
    R: ?Sized + Send + Sync + 'static,
{
    let mut router = router.layer(CatchPanicLayer::custom(panic_response));

    if state.config.security.auth_enabled {
        router = router.layer(from_fn_with_state(state.gate.clone(), auth_gate_middleware));
    } else {
        tracing::warn!("Authentication gate is disabled");
    }

    router
        .layer(from_fn(request_logging_middleware))
        .layer(build_cors_layer(&state.config.server.cors_allowed_origins))
        .with_state(state)
}
