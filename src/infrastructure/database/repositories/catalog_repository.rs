//! SeaORM implementation of CatalogRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use super::db_err;
use crate::domain::catalog::{CatalogRepository, Company, Country, NewCompany};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{company, country};

pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn company_to_domain(m: company::Model) -> Company {
    Company {
        id: m.id,
        name: m.name,
        phone: m.phone,
        address: m.address,
        slug: m.slug,
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn company_slug_exists(&self, slug: &str) -> DomainResult<bool> {
        let count = company::Entity::find()
            .filter(company::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert_company(&self, new: NewCompany, slug: String) -> DomainResult<Company> {
        debug!("Inserting company: {}", slug);
        let model = company::ActiveModel {
            name: Set(new.name),
            phone: Set(new.phone),
            address: Set(new.address),
            slug: Set(slug),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(company_to_domain(model))
    }

    async fn find_company(&self, id: i32) -> DomainResult<Option<Company>> {
        let model = company::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(company_to_domain))
    }

    async fn insert_country(&self, name: String) -> DomainResult<Country> {
        debug!("Inserting country: {}", name);
        let model = country::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(Country {
            id: model.id,
            name: model.name,
        })
    }

    async fn find_country(&self, id: i32) -> DomainResult<Option<Country>> {
        let model = country::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| Country {
            id: m.id,
            name: m.name,
        }))
    }
}
