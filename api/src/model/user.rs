use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, UpdateUserProfile, UpdateUserRole},
        User,
    },
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

#[derive(Serialize, Deserialize, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Admin => Self::Admin,
            RoleName::User => Self::User,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserResponse>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: RoleName,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            user_name,
            email,
            role,
        } = value;
        Self {
            user_id,
            user_name,
            email,
            role: RoleName::from(role),
        }
    }
}

// セキュリティ PIN は数字のみ 8 桁以上
fn digits_only(value: &str, _ctx: &()) -> garde::Result {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(garde::Error::new("security pin must contain digits only"))
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(length(min = 1))]
    user_name: String,
    #[garde(email)]
    email: String,
    #[garde(length(min = 7))]
    password: String,
    #[garde(length(min = 8), custom(digits_only))]
    security_pin: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            user_name,
            email,
            password,
            security_pin,
        } = value;
        Self {
            user_name,
            email,
            password,
            security_pin,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileRequest {
    #[garde(inner(length(min = 3)))]
    user_name: Option<String>,
    #[garde(inner(email))]
    email: Option<String>,
    #[garde(inner(length(min = 7)))]
    password: Option<String>,
    #[garde(inner(length(min = 8), custom(digits_only)))]
    security_pin: Option<String>,
}

#[derive(new)]
pub struct UpdateUserProfileRequestWithUserId(UserId, UpdateUserProfileRequest);
impl From<UpdateUserProfileRequestWithUserId> for UpdateUserProfile {
    fn from(value: UpdateUserProfileRequestWithUserId) -> Self {
        let UpdateUserProfileRequestWithUserId(
            user_id,
            UpdateUserProfileRequest {
                user_name,
                email,
                password,
                security_pin,
            },
        ) = value;
        UpdateUserProfile {
            user_id,
            user_name,
            email,
            password,
            security_pin,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    role: RoleName,
}

#[derive(new)]
pub struct UpdateUserRoleRequestWithUserId(UserId, UpdateUserRoleRequest);
impl From<UpdateUserRoleRequestWithUserId> for UpdateUserRole {
    fn from(value: UpdateUserRoleRequestWithUserId) -> Self {
        let UpdateUserRoleRequestWithUserId(user_id, UpdateUserRoleRequest { role }) = value;
        Self {
            user_id,
            role: Role::from(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_pin_must_be_long_digits() {
        let ok: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "userName": "tanaka",
            "email": "tanaka@example.com",
            "password": "pass1234",
            "securityPin": "12345678",
        }))
        .unwrap();
        assert!(ok.validate(&()).is_ok());

        let short_pin: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "userName": "tanaka",
            "email": "tanaka@example.com",
            "password": "pass1234",
            "securityPin": "1234567",
        }))
        .unwrap();
        assert!(short_pin.validate(&()).is_err());

        let alpha_pin: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "userName": "tanaka",
            "email": "tanaka@example.com",
            "password": "pass1234",
            "securityPin": "1234abcd",
        }))
        .unwrap();
        assert!(alpha_pin.validate(&()).is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "userName": "tanaka",
            "email": "tanaka@example.com",
            "password": "pass12",
            "securityPin": "12345678",
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }
}
