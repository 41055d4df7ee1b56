use async_trait::async_trait;
use idm_core::error::CoreError;
use idm_core::role::{CreateRoleRequest, RoleResponse};
use idm_core::types::DbId;
use idm_core::validation::validate;
use idm_db::models::role::Role;
use idm_db::repositories::RoleRepository;

use super::{classify_write, finish, RoleService};

/// [`RoleService`] over any [`RoleRepository`].
pub struct RoleManager<R> {
    repo: R,
}

impl<R: RoleRepository> RoleManager<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    async fn insert(&self, tx: &mut R::Tx, input: CreateRoleRequest) -> Result<DbId, CoreError> {
        let existing = self
            .repo
            .find_by_name_with_transaction(tx, &input.name)
            .await
            .map_err(|e| CoreError::internal("look up role by name", e))?;
        if existing.is_some() {
            return Err(name_taken(&input.name));
        }

        let name = input.name.clone();
        let mut role = Role::new(
            input.name,
            Some(input.description),
            input.status,
            input.parent_id,
        );
        self.repo
            .add_with_transaction(tx, &mut role)
            .await
            .map_err(|e| {
                classify_write(
                    e,
                    "insert role",
                    || name_taken(&name),
                    || CoreError::validation("parent_id does not exist"),
                )
            })?;
        Ok(role.id)
    }
}

fn name_taken(name: &str) -> CoreError {
    CoreError::AlreadyExists(format!("Role with name {name} already exists"))
}

/// A role referenced by employees cannot be removed.
fn classify_delete(err: sqlx::Error, context: &'static str) -> CoreError {
    classify_write(
        err,
        context,
        || CoreError::internal(context, "unexpected unique violation"),
        || CoreError::validation("role is still referenced by employees"),
    )
}

fn to_response(role: Role) -> RoleResponse {
    RoleResponse {
        id: role.id,
        name: role.name,
        description: role.description.unwrap_or_default(),
        status: role.status,
        parent_id: role.parent_id,
        created_at: role.created_at,
        updated_at: role.updated_at,
    }
}

#[async_trait]
impl<R: RoleRepository> RoleService for RoleManager<R> {
    async fn find_by_id(&self, id: DbId) -> Result<RoleResponse, CoreError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| CoreError::internal("find role", e))?
            .map(to_response)
            .ok_or(CoreError::NotFound { entity: "Role", id })
    }

    async fn create_role(&self, input: CreateRoleRequest) -> Result<DbId, CoreError> {
        validate(&input)?;

        let mut tx = self
            .repo
            .begin_transaction()
            .await
            .map_err(|e| CoreError::internal("begin role transaction", e))?;
        let result = self.insert(&mut tx, input).await;
        let id = finish(tx, result, "commit role").await?;

        tracing::info!(role_id = id, "Role created");
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<RoleResponse>, CoreError> {
        let roles = self
            .repo
            .find_all()
            .await
            .map_err(|e| CoreError::internal("list roles", e))?;
        Ok(roles.into_iter().map(to_response).collect())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError> {
        let roles = self
            .repo
            .find_by_ids(ids)
            .await
            .map_err(|e| CoreError::internal("find roles by ids", e))?;
        Ok(roles.into_iter().map(to_response).collect())
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError> {
        let removed = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|e| classify_delete(e, "delete role"))?;
        tracing::info!(role_id = id, removed, "Role delete");
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let removed = self
            .repo
            .delete_by_ids(ids)
            .await
            .map_err(|e| classify_delete(e, "delete roles"))?;
        tracing::info!(requested = ids.len(), removed, "Role bulk delete");
        Ok(())
    }
}
