pub mod account_book_service;
pub mod account_book_service_impl;
pub use account_book_service::{
    AccountBookDetail, AccountBookError, AccountBookService, AccountBookSummary, CategoryTotal,
    Dashboard,
};
pub use account_book_service_impl::SeaOrmAccountBookService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod like_service;
pub mod like_service_impl;
pub use like_service::{LikeError, LikeService};
pub use like_service_impl::SeaOrmLikeService;

pub mod oauth_service;
pub mod oauth_service_impl;
pub use oauth_service::{OAuthError, OAuthService};
pub use oauth_service_impl::SeaOrmOAuthService;

pub mod user_profile_service;
pub mod user_profile_service_impl;
pub use user_profile_service::{UserProfileError, UserProfileService};
pub use user_profile_service_impl::SeaOrmUserProfileService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
