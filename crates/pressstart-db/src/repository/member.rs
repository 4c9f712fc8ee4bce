//! # Member Repository
//!
//! Loyalty members: sign-up, profile updates, search and login.
//!
//! Passwords arrive as plaintext on [`NewMember`] and are hashed with Argon2
//! before the INSERT. Hashes are read back into [`Member`] for
//! [`MemberRepository::authenticate`] but never serialized.

use pressstart_core::search::entities::MEMBERS;
use pressstart_core::{Member, NewMember, SearchCriteria};
use sqlx::PgPool;
use tracing::{debug, info};

use super::{fetch_all, fetch_by_id, fetch_search, validated, write_failed};
use crate::credentials::{hash_password, verify_password};
use crate::error::{DbError, DbResult};

/// Repository for members.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Creates a new MemberRepository.
    pub fn new(pool: PgPool) -> Self {
        MemberRepository { pool }
    }

    /// Searches members by `id`, `email`, `firstName`, `lastName` (all
    /// prefix, case-insensitive) and `phone` (exact).
    pub async fn search(&self, criteria: &SearchCriteria) -> DbResult<Vec<Member>> {
        fetch_search(&self.pool, &MEMBERS, criteria).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Member>> {
        fetch_by_id(&self.pool, &MEMBERS, id).await
    }

    pub async fn all(&self) -> DbResult<Vec<Member>> {
        fetch_all(&self.pool, &MEMBERS).await
    }

    /// Signs up a member.
    ///
    /// ## Errors
    /// - `DbError::Invalid` for bad input, including a short password
    /// - `DbError::UniqueViolation` when the email is taken (any case)
    pub async fn create(&self, member: &NewMember) -> DbResult<Member> {
        validated("member", member)?;
        let password_hash = hash_password(&member.password)?;

        let created = sqlx::query_as::<_, Member>(&format!(
            r#"
            INSERT INTO tbl_members (
                member_password_hash, preferred_store_id, member_first_name,
                member_last_name, member_postal_code, member_phone,
                member_email, member_mailing_list
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            MEMBERS.columns
        ))
        .bind(&password_hash)
        .bind(member.preferred_store_id)
        .bind(&member.member_first_name)
        .bind(&member.member_last_name)
        .bind(member.member_postal_code.as_deref().map(str::to_ascii_uppercase))
        .bind(&member.member_phone)
        .bind(&member.member_email)
        .bind(member.member_mailing_list)
        .fetch_one(&self.pool)
        .await
        .map_err(write_failed("member", "insert"))?;

        info!(id = created.member_id, "Member signed up");
        Ok(created)
    }

    /// Updates a member's profile. The password hash is left untouched.
    pub async fn update(&self, member: &Member) -> DbResult<Member> {
        validated("member", member)?;
        debug!(id = member.member_id, "Updating member");

        let updated = sqlx::query_as::<_, Member>(&format!(
            r#"
            UPDATE tbl_members SET
                preferred_store_id = $1,
                member_first_name = $2,
                member_last_name = $3,
                member_postal_code = $4,
                member_phone = $5,
                member_email = $6,
                member_mailing_list = $7
            WHERE member_id = $8
            RETURNING {}
            "#,
            MEMBERS.columns
        ))
        .bind(member.preferred_store_id)
        .bind(&member.member_first_name)
        .bind(&member.member_last_name)
        .bind(member.member_postal_code.as_deref().map(str::to_ascii_uppercase))
        .bind(&member.member_phone)
        .bind(&member.member_email)
        .bind(member.member_mailing_list)
        .bind(member.member_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_failed("member", "update"))?;

        updated.ok_or_else(|| DbError::not_found("Member", member.member_id))
    }

    /// Checks a login. Email matching ignores case.
    ///
    /// Returns `Ok(None)` for an unknown email or a wrong password; the two
    /// cases are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> DbResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(&format!(
            "SELECT {} FROM tbl_members WHERE lower(member_email) = lower($1)",
            MEMBERS.columns
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        let verified = member.filter(|m| verify_password(password, &m.member_password_hash));
        debug!(success = verified.is_some(), "Member login attempt");

        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use crate::credentials::verify_password;
    use crate::error::DbError;
    use crate::testing::TestDb;
    use pressstart_core::{SearchCriteria, ValidationError};

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_create_hashes_password() {
        let test = TestDb::new().await;

        let member = test.member("samus@example.com").await;
        assert_ne!(member.member_password_hash, "password123");
        assert!(verify_password("password123", &member.member_password_hash));

        let fetched = test.db.members().get_by_id(member.member_id).await.unwrap();
        assert_eq!(fetched, Some(member));

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_search_first_name_prefix() {
        let test = TestDb::new().await;
        let members = test.db.members();

        let al = members
            .create(&TestDb::new_member("al@example.com", "Alphonse", "Elric"))
            .await
            .unwrap();
        members
            .create(&TestDb::new_member("ed@example.com", "Edward", "Elric"))
            .await
            .unwrap();

        let found = members
            .search(&SearchCriteria::new().with("firstName", "al"))
            .await
            .unwrap();
        assert_eq!(found, vec![al]);

        let elrics = members
            .search(&SearchCriteria::new().with("lastName", "ELR"))
            .await
            .unwrap();
        assert_eq!(elrics.len(), 2);

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_search_phone_is_exact() {
        let test = TestDb::new().await;
        let members = test.db.members();

        let mut input = TestDb::new_member("ryu@example.com", "Ryu", "Hoshi");
        input.member_phone = Some("4165550199".into());
        let ryu = members.create(&input).await.unwrap();

        let exact = SearchCriteria::new().with("phone", "4165550199");
        assert_eq!(members.search(&exact).await.unwrap(), vec![ryu]);

        let partial = SearchCriteria::new().with("phone", "416");
        assert!(members.search(&partial).await.unwrap().is_empty());

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_duplicate_email_ignores_case() {
        let test = TestDb::new().await;
        test.member("link@hyrule.ca").await;

        let err = test
            .db
            .members()
            .create(&TestDb::new_member("LINK@hyrule.ca", "Link", "Hero"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(test.count("tbl_members").await, 1);

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_short_password_is_rejected() {
        let test = TestDb::new().await;

        let mut input = TestDb::new_member("short@example.com", "Short", "Pass");
        input.password = "abc".into();
        let err = test.db.members().create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::Invalid(ValidationError::TooShort { .. })));

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_update_keeps_password() {
        let test = TestDb::new().await;
        let mut member = test.member("kirby@example.com").await;

        member.member_first_name = "Kirby".into();
        member.member_mailing_list = true;
        member.member_password_hash = String::new();
        let updated = test.db.members().update(&member).await.unwrap();

        assert_eq!(updated.member_first_name, "Kirby");
        assert!(updated.member_mailing_list);
        assert!(verify_password("password123", &updated.member_password_hash));

        member.member_id += 1000;
        assert!(test.db.members().update(&member).await.unwrap_err().is_not_found());

        test.teardown().await;
    }

    #[tokio::test]
    #[ignore = "requires PRESSSTART_TEST_DATABASE_URL"]
    async fn test_authenticate() {
        let test = TestDb::new().await;
        let member = test.member("mario@mushroom.ca").await;
        let members = test.db.members();

        let ok = members.authenticate("Mario@Mushroom.ca", "password123").await.unwrap();
        assert_eq!(ok.map(|m| m.member_id), Some(member.member_id));

        assert!(members.authenticate("mario@mushroom.ca", "wrong-password").await.unwrap().is_none());
        assert!(members.authenticate("luigi@mushroom.ca", "password123").await.unwrap().is_none());

        test.teardown().await;
    }
}
