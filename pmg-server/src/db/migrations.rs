//! Linear schema migrations
//!
//! Each migration runs in its own transaction and is recorded in
//! `schema_migrations`. Versions are applied in ascending order and never
//! re-run.

use sqlx::PgPool;

use super::DbError;

/// A single schema change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

/// All migrations, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "core_entities",
        sql: r#"
        CREATE TABLE house (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            name_short VARCHAR(20) NOT NULL
        );

        CREATE TABLE party (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE
        );

        CREATE TABLE province (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE
        );

        CREATE TABLE committee (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            about TEXT,
            contact_details TEXT,
            ad_hoc BOOLEAN NOT NULL DEFAULT FALSE,
            house_id INTEGER NOT NULL
                CONSTRAINT fk_committee_house_id_house REFERENCES house(id)
        );
        CREATE INDEX ix_committee_house_id ON committee (house_id);

        CREATE TABLE member (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            profile_pic_url VARCHAR(255),
            bio TEXT,
            current BOOLEAN NOT NULL DEFAULT TRUE,
            house_id INTEGER CONSTRAINT fk_member_house_id_house REFERENCES house(id),
            party_id INTEGER CONSTRAINT fk_member_party_id_party REFERENCES party(id),
            province_id INTEGER CONSTRAINT fk_member_province_id_province REFERENCES province(id)
        );

        CREATE TABLE minister (
            id SERIAL PRIMARY KEY,
            name VARCHAR(1024) NOT NULL
        );
        "#,
    },
    Migration {
        version: 2,
        name: "bills",
        sql: r#"
        CREATE TABLE bill_type (
            id SERIAL PRIMARY KEY,
            prefix VARCHAR(5),
            description VARCHAR(255),
            name VARCHAR(255) NOT NULL
        );

        CREATE TABLE bill_status (
            id SERIAL PRIMARY KEY,
            name VARCHAR(32) NOT NULL UNIQUE,
            description VARCHAR(255) NOT NULL
        );

        CREATE TABLE bill (
            id SERIAL PRIMARY KEY,
            title VARCHAR(250) NOT NULL,
            number INTEGER,
            year INTEGER NOT NULL,
            code VARCHAR(100),
            introduced_by VARCHAR(255),
            date_of_introduction DATE,
            date_of_assent DATE,
            effective_date DATE,
            act_name VARCHAR(250),
            status_id INTEGER CONSTRAINT fk_bill_status_id_bill_status REFERENCES bill_status(id),
            type_id INTEGER NOT NULL CONSTRAINT fk_bill_type_id_bill_type REFERENCES bill_type(id),
            place_of_introduction_id INTEGER
                CONSTRAINT fk_bill_place_of_introduction_id_house REFERENCES house(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        CREATE INDEX ix_bill_year ON bill (year);
        "#,
    },
    Migration {
        version: 3,
        name: "events_and_files",
        sql: r#"
        CREATE TABLE event (
            id SERIAL PRIMARY KEY,
            type VARCHAR(50) NOT NULL,
            date TIMESTAMPTZ NOT NULL,
            title VARCHAR(1024),
            summary TEXT,
            body TEXT,
            actual_start_time TIME,
            actual_end_time TIME,
            committee_id INTEGER
                CONSTRAINT fk_event_committee_id_committee REFERENCES committee(id) ON DELETE SET NULL,
            house_id INTEGER CONSTRAINT fk_event_house_id_house REFERENCES house(id),
            member_id INTEGER
                CONSTRAINT fk_event_member_id_member REFERENCES member(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        CREATE INDEX ix_event_type ON event (type);
        CREATE INDEX ix_event_date ON event (date);
        CREATE INDEX ix_event_committee_id ON event (committee_id);

        CREATE TABLE event_bills (
            event_id INTEGER NOT NULL
                CONSTRAINT fk_event_bills_event_id_event REFERENCES event(id) ON DELETE CASCADE,
            bill_id INTEGER NOT NULL
                CONSTRAINT fk_event_bills_bill_id_bill REFERENCES bill(id) ON DELETE CASCADE,
            PRIMARY KEY (event_id, bill_id)
        );

        CREATE TABLE file (
            id SERIAL PRIMARY KEY,
            title VARCHAR(255),
            file_mime VARCHAR(100),
            origname VARCHAR(255),
            file_path VARCHAR(255) NOT NULL,
            file_bytes BIGINT,
            duration INTEGER,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE event_files (
            event_id INTEGER NOT NULL
                CONSTRAINT event_files_event_id_fkey REFERENCES event(id) ON DELETE CASCADE,
            file_id INTEGER NOT NULL
                CONSTRAINT event_files_file_id_fkey REFERENCES file(id) ON DELETE CASCADE,
            PRIMARY KEY (event_id, file_id)
        );

        CREATE TABLE content (
            id SERIAL PRIMARY KEY,
            event_id INTEGER NOT NULL
                CONSTRAINT fk_content_event_id_event REFERENCES event(id) ON DELETE CASCADE,
            type VARCHAR(50) NOT NULL,
            title VARCHAR(1024),
            summary TEXT,
            body TEXT,
            file_id INTEGER
                CONSTRAINT fk_content_file_id_file REFERENCES file(id) ON DELETE SET NULL
        );
        CREATE INDEX ix_content_event_id ON content (event_id);

        CREATE TABLE committee_meeting_attendance (
            id SERIAL PRIMARY KEY,
            alternate_member BOOLEAN NOT NULL DEFAULT FALSE,
            attendance VARCHAR(50) NOT NULL,
            meeting_id INTEGER NOT NULL
                CONSTRAINT fk_cma_meeting_id_event REFERENCES event(id) ON DELETE CASCADE,
            member_id INTEGER NOT NULL
                CONSTRAINT fk_cma_member_id_member REFERENCES member(id) ON DELETE CASCADE
        );
        "#,
    },
    Migration {
        version: 4,
        name: "committee_documents_and_questions",
        sql: r#"
        CREATE TABLE call_for_comment (
            id SERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            body TEXT,
            summary TEXT,
            start_date DATE NOT NULL,
            end_date DATE,
            committee_id INTEGER
                CONSTRAINT fk_call_for_comment_committee_id_committee
                REFERENCES committee(id) ON DELETE SET NULL
        );

        CREATE TABLE tabled_committee_report (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT,
            summary TEXT,
            start_date DATE,
            committee_id INTEGER
                CONSTRAINT fk_tabled_committee_report_committee_id_committee
                REFERENCES committee(id) ON DELETE SET NULL
        );

        CREATE TABLE committee_question (
            id SERIAL PRIMARY KEY,
            code VARCHAR(50) NOT NULL,
            date DATE NOT NULL,
            question TEXT NOT NULL,
            answer TEXT,
            asked_by_name VARCHAR(1024),
            asked_by_member_id INTEGER
                CONSTRAINT fk_committee_question_asked_by_member_id_member
                REFERENCES member(id) ON DELETE SET NULL,
            minister_id INTEGER
                CONSTRAINT fk_committee_question_minister_id_minister
                REFERENCES minister(id) ON DELETE SET NULL,
            committee_id INTEGER
                CONSTRAINT fk_committee_question_committee_id_committee
                REFERENCES committee(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        CREATE INDEX ix_committee_question_date ON committee_question (date);

        CREATE TABLE question_reply (
            id SERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            body TEXT,
            question_number VARCHAR(255),
            start_date DATE,
            minister_id INTEGER
                CONSTRAINT fk_question_reply_minister_id_minister
                REFERENCES minister(id) ON DELETE SET NULL,
            committee_id INTEGER
                CONSTRAINT fk_question_reply_committee_id_committee
                REFERENCES committee(id) ON DELETE SET NULL
        );
        "#,
    },
    Migration {
        version: 5,
        name: "users_alerts_and_saved_searches",
        sql: r#"
        CREATE TABLE "user" (
            id SERIAL PRIMARY KEY,
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255),
            api_key VARCHAR(64) UNIQUE,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            subscribe_daily_schedule BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );

        CREATE TABLE role (
            id SERIAL PRIMARY KEY,
            name VARCHAR(80) NOT NULL UNIQUE,
            description VARCHAR(255)
        );

        CREATE TABLE roles_users (
            user_id INTEGER NOT NULL
                CONSTRAINT fk_roles_users_user_id_user REFERENCES "user"(id) ON DELETE CASCADE,
            role_id INTEGER NOT NULL
                CONSTRAINT fk_roles_users_role_id_role REFERENCES role(id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, role_id)
        );

        CREATE TABLE user_committee_alerts (
            user_id INTEGER NOT NULL
                CONSTRAINT fk_user_committee_alerts_user_id_user REFERENCES "user"(id) ON DELETE CASCADE,
            committee_id INTEGER NOT NULL
                CONSTRAINT fk_user_committee_alerts_committee_id_committee
                REFERENCES committee(id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, committee_id)
        );

        CREATE TABLE saved_search (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL
                CONSTRAINT fk_saved_search_user_id_user REFERENCES "user"(id) ON DELETE CASCADE,
            search VARCHAR(255) NOT NULL,
            content_type VARCHAR(255),
            committee_id INTEGER
                CONSTRAINT fk_saved_search_committee_id_committee
                REFERENCES committee(id) ON DELETE CASCADE,
            last_alerted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ DEFAULT now()
        );
        CREATE INDEX ix_saved_search_created_at ON saved_search (created_at);
        "#,
    },
    Migration {
        version: 6,
        name: "static_pages",
        sql: r#"
        CREATE TABLE page (
            id SERIAL PRIMARY KEY,
            title VARCHAR NOT NULL,
            slug VARCHAR NOT NULL UNIQUE,
            body TEXT,
            date DATE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ DEFAULT now()
        );
        "#,
    },
    Migration {
        version: 7,
        name: "tabled_report_no_summary",
        sql: r#"
        ALTER TABLE tabled_committee_report DROP COLUMN IF EXISTS summary;
        "#,
    },
];

/// Apply all pending migrations.
pub async fn run(pool: &PgPool) -> Result<usize, DbError> {
    run_migrations(pool, MIGRATIONS).await
}

/// Apply pending migrations from an explicit list.
pub async fn run_migrations(pool: &PgPool, migrations: &[Migration]) -> Result<usize, DbError> {
    check_order(migrations)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    let applied: Vec<(i64,)> = sqlx::query_as("SELECT version FROM schema_migrations")
        .fetch_all(pool)
        .await?;
    let applied: Vec<i64> = applied.into_iter().map(|(v,)| v).collect();

    let mut count = 0;
    for migration in migrations.iter().filter(|m| !applied.contains(&m.version)) {
        tracing::info!(version = migration.version, name = migration.name, "Applying migration");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        count += 1;
    }

    if count == 0 {
        tracing::debug!("Schema is up to date");
    }
    Ok(count)
}

/// Versions must be strictly increasing.
fn check_order(migrations: &[Migration]) -> Result<(), DbError> {
    for pair in migrations.windows(2) {
        if pair[1].version <= pair[0].version {
            return Err(DbError::Migration {
                version: pair[1].version,
                reason: format!("must be greater than {}", pair[0].version),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_migrations_are_ordered() {
        assert!(check_order(MIGRATIONS).is_ok());
        assert_eq!(MIGRATIONS.first().map(|m| m.version), Some(1));
    }

    #[test]
    fn rejects_out_of_order_versions() {
        let bad = [
            Migration { version: 2, name: "b", sql: "" },
            Migration { version: 2, name: "c", sql: "" },
        ];
        let err = check_order(&bad).unwrap_err();
        assert!(matches!(err, DbError::Migration { version: 2, .. }));
    }

    #[test]
    fn event_files_cascade_both_ways() {
        let events = MIGRATIONS.iter().find(|m| m.name == "events_and_files").unwrap();
        assert!(events.sql.contains("event_files_event_id_fkey REFERENCES event(id) ON DELETE CASCADE"));
        assert!(events.sql.contains("event_files_file_id_fkey REFERENCES file(id) ON DELETE CASCADE"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();

        run(&pool).await.unwrap();
        assert_eq!(run(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn tabled_reports_have_no_summary() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        run(&pool).await.unwrap();

        let (columns,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM information_schema.columns
            WHERE table_name = 'tabled_committee_report' AND column_name = 'summary'
            "#,
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(columns, 0);
    }
}
