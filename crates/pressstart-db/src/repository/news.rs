//! News articles and promotional offers.

use pressstart_core::{NewNews, News};
use sqlx::PgPool;
use tracing::debug;

use super::{validated, write_failed};
use crate::error::{DbError, DbResult};

const COLUMNS: &str = "news_id, news_title, news_date_added, news_article, news_front_page";

/// Repository for news and offers.
#[derive(Debug, Clone)]
pub struct NewsRepository {
    pool: PgPool,
}

impl NewsRepository {
    /// Creates a new NewsRepository.
    pub fn new(pool: PgPool) -> Self {
        NewsRepository { pool }
    }

    /// All articles, newest first.
    pub async fn all(&self) -> DbResult<Vec<News>> {
        let news = sqlx::query_as::<_, News>(&format!(
            "SELECT {COLUMNS} FROM tbl_news ORDER BY news_date_added DESC, news_id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(news)
    }

    /// Offers flagged for the storefront, newest first.
    pub async fn front_page(&self) -> DbResult<Vec<News>> {
        let news = sqlx::query_as::<_, News>(&format!(
            r#"
            SELECT {COLUMNS} FROM tbl_news
            WHERE news_front_page
            ORDER BY news_date_added DESC, news_id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(news)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<News>> {
        let news = sqlx::query_as::<_, News>(&format!(
            "SELECT {COLUMNS} FROM tbl_news WHERE news_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(news)
    }

    /// Publishes an article. A missing date means today.
    pub async fn create(&self, news: &NewNews) -> DbResult<News> {
        validated("news", news)?;
        debug!(title = %news.news_title, front_page = news.news_front_page, "Creating news");

        let created = sqlx::query_as::<_, News>(&format!(
            r#"
            INSERT INTO tbl_news (news_title, news_date_added, news_article, news_front_page)
            VALUES ($1, COALESCE($2, CURRENT_DATE), $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&news.news_title)
        .bind(news.news_date_added)
        .bind(&news.news_article)
        .bind(news.news_front_page)
        .fetch_one(&self.pool)
        .await
        .map_err(write_failed("news", "insert"))?;

        Ok(created)
    }

    pub async fn update(&self, news: &News) -> DbResult<News> {
        validated("news", news)?;

        let updated = sqlx::query_as::<_, News>(&format!(
            r#"
            UPDATE tbl_news SET
                news_title = $1,
                news_date_added = $2,
                news_article = $3,
                news_front_page = $4
            WHERE news_id = $5
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&news.news_title)
        .bind(news.news_date_added)
        .bind(&news.news_article)
        .bind(news.news_front_page)
        .bind(news.news_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_failed("news", "update"))?;

        updated.ok_or_else(|| DbError::not_found("News", news.news_id))
    }
}
