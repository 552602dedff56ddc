//! Storage Ports
//!
//! The engine talks to persistence through these traits so runs are
//! testable without a database. The shared repositories back them in
//! production; tests use in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use procura_database::{AnalysisRepository, MessageRepository, SupplierRepository};
use procura_models::{Analysis, AnalysisStatus, Category, GeneratedMessage, NewMessage, SupplierRecord};

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn find_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Analysis>>;
    async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<()>;
    async fn complete(&self, id: Uuid, summary: &str, fallback: bool) -> Result<()>;
}

#[async_trait]
pub trait SupplierStore: Send + Sync {
    async fn find_by_analysis(&self, analysis_id: Uuid) -> Result<Vec<SupplierRecord>>;
    async fn set_evaluation(&self, id: Uuid, performance: f64, category: Category) -> Result<()>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create(&self, message: NewMessage) -> Result<GeneratedMessage>;
}

#[async_trait]
impl AnalysisStore for AnalysisRepository {
    async fn find_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Analysis>> {
        AnalysisRepository::find_for_owner(self, id, owner_id).await
    }

    async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<()> {
        AnalysisRepository::set_status(self, id, status).await
    }

    async fn complete(&self, id: Uuid, summary: &str, fallback: bool) -> Result<()> {
        AnalysisRepository::complete(self, id, summary, fallback).await
    }
}

#[async_trait]
impl SupplierStore for SupplierRepository {
    async fn find_by_analysis(&self, analysis_id: Uuid) -> Result<Vec<SupplierRecord>> {
        SupplierRepository::find_by_analysis(self, analysis_id).await
    }

    async fn set_evaluation(&self, id: Uuid, performance: f64, category: Category) -> Result<()> {
        SupplierRepository::set_evaluation(self, id, performance, category).await
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn create(&self, message: NewMessage) -> Result<GeneratedMessage> {
        MessageRepository::create(self, message).await
    }
}
