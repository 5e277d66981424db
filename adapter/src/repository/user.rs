use crate::database::{model::user::UserRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{CreateUser, DeleteUser, UpdateUserProfile, UpdateUserRole},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        // ユーザー名は一意
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM users WHERE user_name = $1")
                .bind(&event.user_name)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        if exists.is_some() {
            return Err(AppError::ResourceConflict(
                "このユーザー名は既に使用されています。".into(),
            ));
        }

        let user_id = UserId::new();
        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;
        let security_pin_hash = bcrypt::hash(&event.security_pin, bcrypt::DEFAULT_COST)?;

        let res = sqlx::query(
            r#"
                INSERT INTO users
                (user_id, user_name, email, password_hash, security_pin_hash, role)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(&event.user_name)
        .bind(&event.email)
        .bind(&password_hash)
        .bind(&security_pin_hash)
        .bind(Role::User.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        Ok(User {
            user_id,
            user_name: event.user_name,
            email: event.email,
            role: Role::User,
        })
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
                SELECT user_id, user_name, email, role
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_name(&self, user_name: &str) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
                SELECT user_id, user_name, email, role
                FROM users
                WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
                SELECT user_id, user_name, email, role
                FROM users
                ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(User::try_from).collect()
    }

    // 本人によるアカウント設定の変更。
    // ユーザー名を変更する場合は、この名前を複製して保持している
    // reservations.user_name も同一トランザクションで追従させる
    async fn update_profile(&self, event: UpdateUserProfile) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let current_name: Option<String> = sqlx::query_scalar(
            "SELECT user_name FROM users WHERE user_id = $1 FOR UPDATE",
        )
        .bind(event.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(current_name) = current_name else {
            return Err(AppError::EntityNotFound(format!(
                "ユーザー（{}）が見つかりませんでした。",
                event.user_id
            )));
        };

        // 変更後のユーザー名が他人に使われていないか先に確認する
        if let Some(new_name) = &event.user_name {
            let taken: Option<i32> = sqlx::query_scalar(
                "SELECT 1 FROM users WHERE user_name = $1 AND user_id <> $2",
            )
            .bind(new_name)
            .bind(event.user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
            if taken.is_some() {
                return Err(AppError::ResourceConflict(
                    "このユーザー名は既に使用されています。".into(),
                ));
            }
        }

        let password_hash = event
            .password
            .map(|p| bcrypt::hash(p, bcrypt::DEFAULT_COST))
            .transpose()?;
        let security_pin_hash = event
            .security_pin
            .map(|p| bcrypt::hash(p, bcrypt::DEFAULT_COST))
            .transpose()?;

        let res = sqlx::query(
            r#"
                UPDATE users
                SET
                    user_name = COALESCE($2, user_name),
                    email = COALESCE($3, email),
                    password_hash = COALESCE($4, password_hash),
                    security_pin_hash = COALESCE($5, security_pin_hash),
                    updated_at = NOW()
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(&event.user_name)
        .bind(&event.email)
        .bind(&password_hash)
        .bind(&security_pin_hash)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been updated".into(),
            ));
        }

        if let Some(new_name) = &event.user_name {
            if *new_name != current_name {
                sqlx::query("UPDATE reservations SET user_name = $2 WHERE user_name = $1")
                    .bind(&current_name)
                    .bind(new_name)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;
            }
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn update_role(&self, event: UpdateUserRole) -> AppResult<()> {
        let res = sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(event.user_id)
            .bind(event.role.as_ref())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "ユーザー（{}）が見つかりませんでした。",
                event.user_id
            )));
        }

        Ok(())
    }

    async fn delete(&self, event: DeleteUser) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(event.user_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "ユーザー（{}）が見つかりませんでした。",
                event.user_id
            )));
        }

        Ok(())
    }
}
