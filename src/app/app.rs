use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::app_conf::AppConfig;
use crate::config::{AdminUserConfig, JwtConfig, MinioConfig, MongoConfig};
use crate::middlewares::auth_middleware::AuthState;
use crate::model::user::{User, ROLE_ADMIN};
use crate::repository::client_repo::{ClientRepository, MongoClientRepository};
use crate::repository::document_repo::{DocumentRepository, MongoDocumentRepository};
use crate::repository::meeting_repo::{MeetingRepository, MongoMeetingRepository};
use crate::repository::quote_repo::{MongoQuoteRepository, QuoteRepository};
use crate::repository::user_repo::{MongoUserRepository, UserRepository};
use crate::router::client_router::client_router;
use crate::router::dashboard_router::dashboard_router;
use crate::router::document_router::document_router;
use crate::router::meeting_router::meeting_router;
use crate::router::quote_router::quote_router;
use crate::router::user_router::user_router;
use crate::service::client_service::ClientServiceImpl;
use crate::service::dashboard_service::DashboardServiceImpl;
use crate::service::document_service::DocumentServiceImpl;
use crate::service::meeting_service::MeetingServiceImpl;
use crate::service::quote_service::QuoteServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::minio::MinioService;

pub struct App {
    config: AppConfig,
    router: Router,
    pub user_service: Arc<UserServiceImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();

        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let minio_config = MinioConfig::from_env().expect("Minio config error");

        let user_repo: Arc<dyn UserRepository> =
            Arc::new(MongoUserRepository::new(&mongo_config).await.expect("User repo error"));
        let client_repo: Arc<dyn ClientRepository> =
            Arc::new(MongoClientRepository::new(&mongo_config).await.expect("Client repo error"));
        let quote_repo: Arc<dyn QuoteRepository> =
            Arc::new(MongoQuoteRepository::new(&mongo_config).await.expect("Quote repo error"));
        let meeting_repo: Arc<dyn MeetingRepository> =
            Arc::new(MongoMeetingRepository::new(&mongo_config).await.expect("Meeting repo error"));
        let document_repo: Arc<dyn DocumentRepository> =
            Arc::new(MongoDocumentRepository::new(&mongo_config).await.expect("Document repo error"));

        let minio_service = Arc::new(MinioService::new(minio_config).await.expect("Minio service error"));
        minio_service.ensure_bucket_exists().await.expect("Minio bucket error");
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));

        let user_service = Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils.clone()));
        let client_service = Arc::new(ClientServiceImpl::new(client_repo.clone()));
        let quote_service = Arc::new(QuoteServiceImpl::new(quote_repo.clone(), client_repo.clone()));
        let meeting_service = Arc::new(MeetingServiceImpl::new(meeting_repo.clone(), client_repo.clone()));
        let document_service = Arc::new(DocumentServiceImpl::new(
            document_repo.clone(),
            client_repo.clone(),
            minio_service,
        ));
        let dashboard_service = Arc::new(DashboardServiceImpl::new(
            client_repo,
            quote_repo,
            meeting_repo,
            document_repo,
        ));

        let auth_state = Arc::new(AuthState {
            jwt_utils,
            user_repo,
        });

        let router = Router::new()
            .merge(user_router(user_service.clone(), auth_state.clone()))
            .merge(client_router(client_service, auth_state.clone()))
            .merge(quote_router(quote_service, auth_state.clone()))
            .merge(meeting_router(meeting_service, auth_state.clone()))
            .merge(document_router(document_service, auth_state.clone()))
            .merge(dashboard_router(dashboard_service, auth_state))
            .route("/health", get(|| async { "OK" }));

        let app = App { config, router, user_service };
        app.create_first_admin_user().await;
        app
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(self.config.host.parse().expect("Invalid host"), self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
        axum::serve(listener, self.router).await.expect("Failed to start server");
    }

    /// Bootstrap the admin account on first startup. Skipped when the admin
    /// env vars are absent or the account already exists.
    async fn create_first_admin_user(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };

        match self.user_service.user_repo.find_by_email(&admin_conf.email).await {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation.");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        let user = User {
            id: None,
            username: admin_conf.username.clone(),
            first_name: admin_conf.first_name.clone(),
            last_name: admin_conf.last_name.clone(),
            email: admin_conf.email.clone(),
            password_hash: String::new(), // Set by register
            role: ROLE_ADMIN.to_string(),
            created_at: None,
            updated_at: None,
        };
        match self.user_service.register(user, admin_conf.password.clone()).await {
            Ok(_) => info!("First admin user created."),
            Err(e) => error!("Failed to create admin user: {e}"),
        }
    }
}
