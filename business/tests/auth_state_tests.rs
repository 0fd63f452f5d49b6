//! Unit tests for auth state types and their methods.

use taskdeck_business::AuthUser;
use taskdeck_business::Role;
use taskdeck_business::auth::{AuthCompute, AuthStatus, CredentialsInput, CredentialsMode};

fn sample_user(role: Role) -> AuthUser {
    AuthUser {
        id: 7,
        email: "user@taskdeck.dev".to_string(),
        name: "Test User".to_string(),
        role,
    }
}

/// Tests for AuthStatus enum
mod auth_status_tests {
    use super::*;

    #[test]
    fn test_auth_status_default_is_not_authenticated() {
        let status = AuthStatus::default();
        assert!(!status.is_authenticated());
    }

    #[test]
    fn test_auth_status_default_has_no_user() {
        let status = AuthStatus::default();
        assert!(status.user().is_none());
    }

    #[test]
    fn test_auth_status_default_has_no_error() {
        let status = AuthStatus::default();
        assert!(status.error().is_none());
    }

    #[test]
    fn test_auth_status_authenticated_is_authenticated() {
        let status = AuthStatus::Authenticated {
            user: sample_user(Role::User),
        };
        assert!(status.is_authenticated());
    }

    #[test]
    fn test_auth_status_authenticated_returns_user() {
        let status = AuthStatus::Authenticated {
            user: sample_user(Role::User),
        };
        assert_eq!(status.user().map(|u| u.email.as_str()), Some("user@taskdeck.dev"));
    }

    #[test]
    fn test_auth_status_authenticating_is_not_authenticated() {
        let status = AuthStatus::Authenticating;
        assert!(!status.is_authenticated());
    }

    #[test]
    fn test_auth_status_authenticating_has_no_user() {
        let status = AuthStatus::Authenticating;
        assert!(status.user().is_none());
    }

    #[test]
    fn test_auth_status_failed_is_not_authenticated() {
        let status = AuthStatus::Failed("Invalid email or password".to_string());
        assert!(!status.is_authenticated());
    }

    #[test]
    fn test_auth_status_failed_returns_error() {
        let status = AuthStatus::Failed("Invalid email or password".to_string());
        assert_eq!(status.error(), Some("Invalid email or password"));
    }

    #[test]
    fn test_auth_status_failed_has_no_user() {
        let status = AuthStatus::Failed("Invalid email or password".to_string());
        assert!(status.user().is_none());
    }
}

/// Tests for AuthCompute
mod auth_compute_tests {
    use super::*;

    #[test]
    fn test_auth_compute_default_is_not_authenticated() {
        let compute = AuthCompute::default();
        assert!(!compute.is_authenticated());
    }

    #[test]
    fn test_auth_compute_default_has_no_user() {
        let compute = AuthCompute::default();
        assert!(compute.user().is_none());
    }

    #[test]
    fn test_auth_compute_default_is_not_admin() {
        let compute = AuthCompute::default();
        assert!(!compute.is_admin());
    }

    #[test]
    fn test_signed_in_compute_is_authenticated() {
        let compute = AuthCompute::signed_in(sample_user(Role::User));
        assert!(compute.is_authenticated());
    }

    #[test]
    fn test_signed_in_compute_returns_user() {
        let compute = AuthCompute::signed_in(sample_user(Role::User));
        assert_eq!(compute.user().map(|u| u.name.as_str()), Some("Test User"));
    }

    #[test]
    fn test_signed_in_regular_user_is_not_admin() {
        let compute = AuthCompute::signed_in(sample_user(Role::User));
        assert!(!compute.is_admin());
    }

    #[test]
    fn test_signed_in_admin_is_admin() {
        let compute = AuthCompute::signed_in(sample_user(Role::Admin));
        assert!(compute.is_admin());
    }

    #[test]
    fn test_auth_compute_delegates_to_status() {
        let compute = AuthCompute {
            status: AuthStatus::Failed("Server error (status 500)".to_string()),
        };
        assert!(!compute.is_authenticated());
        assert!(compute.user().is_none());
    }
}

/// Tests for CredentialsInput
mod credentials_input_tests {
    use super::*;

    #[test]
    fn test_credentials_input_default_mode_is_sign_in() {
        let input = CredentialsInput::default();
        assert_eq!(input.mode, CredentialsMode::SignIn);
    }

    #[test]
    fn test_credentials_input_default_fields_are_empty() {
        let input = CredentialsInput::default();
        assert!(input.email.is_empty());
        assert!(input.password.is_empty());
        assert!(input.name.is_empty());
    }
}
