//! Payslip Repository

use super::{BaseRepository, RepoError, RepoResult, map_create_err};
use crate::db::models::Payslip;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PayslipRepository {
    base: BaseRepository,
}

impl PayslipRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the stored payslip for a document identifier
    pub async fn find_by_payslip_id(&self, payslip_id: &str) -> RepoResult<Option<Payslip>> {
        let id_owned = payslip_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM payslip WHERE payslip_id = $payslip_id LIMIT 1")
            .bind(("payslip_id", id_owned))
            .await?;
        let payslips: Vec<Payslip> = result.take(0)?;
        Ok(payslips.into_iter().next())
    }

    /// Store a payslip, replacing any previous record with the same id.
    ///
    /// One record per payslip_id, matching the one-document-per-identifier
    /// contract of the rendered media file.
    pub async fn upsert(&self, payslip: &Payslip) -> RepoResult<Payslip> {
        if self.find_by_payslip_id(&payslip.payslip_id).await?.is_some() {
            self.replace(payslip).await
        } else {
            self.insert(payslip).await
        }
    }

    async fn replace(&self, payslip: &Payslip) -> RepoResult<Payslip> {
        let mut result = self
            .base
            .db()
            .query("UPDATE payslip CONTENT $content WHERE payslip_id = $payslip_id RETURN AFTER")
            .bind(("payslip_id", payslip.payslip_id.clone()))
            .bind(("content", stripped(payslip)))
            .await?;

        let updated: Vec<Payslip> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to update payslip".to_string()))
    }

    async fn insert(&self, payslip: &Payslip) -> RepoResult<Payslip> {
        let mut result = self
            .base
            .db()
            .query("CREATE payslip CONTENT $content RETURN AFTER")
            .bind(("content", stripped(payslip)))
            .await
            .map_err(map_create_err)?;

        let created: Option<Payslip> = result.take(0).map_err(map_create_err)?;
        created.ok_or_else(|| RepoError::Database("Failed to create payslip".to_string()))
    }
}

/// Drop the record id before CONTENT binding; the engine assigns its own.
fn stripped(payslip: &Payslip) -> Payslip {
    let mut payslip = payslip.clone();
    payslip.id = None;
    payslip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{PayslipStatus, User};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn requestor() -> User {
        User {
            id: None,
            userid: "user-1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            access_token: String::new(),
            avatar: String::new(),
        }
    }

    fn sample(salary: i64) -> Payslip {
        Payslip {
            id: None,
            payslip_id: "user-1".to_string(),
            name: "Ada Lovelace".to_string(),
            requestor: requestor(),
            approver: None,
            requested_on: Utc.with_ymd_and_hms(2023, 4, 2, 9, 0, 0).unwrap(),
            day: Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap(),
            month: Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap(),
            gross_annual_salary: Decimal::new(salary, 0),
            amount_received_bank: Decimal::new(salary / 2, 0),
            tds: Decimal::ZERO,
            account_no: "0042".to_string(),
            ifsc_code: "ABCD0001".to_string(),
            position: "Engineer".to_string(),
            employee_no: String::new(),
            status: PayslipStatus::Requested,
        }
    }

    #[tokio::test]
    async fn upsert_round_trips_amounts_and_dates() {
        let service = DbService::memory().await.unwrap();
        let repo = PayslipRepository::new(service.db.clone());

        repo.upsert(&sample(660_000)).await.unwrap();
        let stored = repo.find_by_payslip_id("user-1").await.unwrap().unwrap();

        assert_eq!(stored.gross_annual_salary, Decimal::new(660_000, 0));
        assert_eq!(stored.day, Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap());
        assert_eq!(stored.status, PayslipStatus::Requested);
        assert_eq!(stored.requestor.userid, "user-1");
    }

    #[tokio::test]
    async fn resubmission_overwrites_the_single_record() {
        let service = DbService::memory().await.unwrap();
        let repo = PayslipRepository::new(service.db.clone());

        repo.upsert(&sample(100_000)).await.unwrap();
        repo.upsert(&sample(200_000)).await.unwrap();

        let stored = repo.find_by_payslip_id("user-1").await.unwrap().unwrap();
        assert_eq!(stored.gross_annual_salary, Decimal::new(200_000, 0));

        let mut result = service.db.query("SELECT * FROM payslip").await.unwrap();
        let all: Vec<Payslip> = result.take(0).unwrap();
        assert_eq!(all.len(), 1);
    }
}
