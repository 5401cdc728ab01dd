//! Load lifecycle controller: owns every `Load` status transition beyond
//! creation and matching.
//!
//! All transitions funnel through [`LoadStatus::can_transition_to`] before
//! any write, and the repositories re-validate the same precondition
//! inside their atomic updates, so a legal-looking call can still surface
//! `Conflict` when a concurrent request got there first.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use crate::domain::ports::{
    CancellationGateway, CancellationReceipt, LoadLifecycle, LoadRepository, MatchRepository,
    SettlementError, UserRepository,
};
use crate::domain::{Error, Identity, Load, LoadDraft, LoadId, LoadStatus, Role};

use super::port_error_mapping::{map_load_error, map_match_error, map_user_error};

/// Fixed fee debited from the shipper when cancelling a matched load.
pub const CANCELLATION_FEE: Decimal = dec!(5.00);

/// Lifecycle controller over load, match, and user repositories plus the
/// settlement gateway.
#[derive(Clone)]
pub struct LoadLifecycleService<L, M, U, G> {
    loads: Arc<L>,
    matches: Arc<M>,
    users: Arc<U>,
    settlement: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<L, M, U, G> LoadLifecycleService<L, M, U, G> {
    /// Create a new controller. The clock supplies "today" for deadline
    /// validation.
    pub fn new(
        loads: Arc<L>,
        matches: Arc<M>,
        users: Arc<U>,
        settlement: Arc<G>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            loads,
            matches,
            users,
            settlement,
            clock,
        }
    }
}

fn map_settlement_error(error: SettlementError) -> Error {
    match error {
        SettlementError::Connection { message } => {
            Error::service_unavailable(format!("settlement gateway unavailable: {message}"))
        }
        SettlementError::Query { message } => {
            Error::internal(format!("settlement transaction failed: {message}"))
        }
        SettlementError::InsufficientFunds { balance } => {
            Error::insufficient_funds("insufficient balance to pay the cancellation fee")
                .with_details(json!({
                    "balance": balance.to_string(),
                    "fee": CANCELLATION_FEE.to_string(),
                }))
        }
        SettlementError::StaleStatus => Error::conflict("load changed concurrently"),
    }
}

impl<L, M, U, G> LoadLifecycleService<L, M, U, G>
where
    L: LoadRepository,
    M: MatchRepository,
    U: UserRepository,
    G: CancellationGateway,
{
    async fn fetch_load(&self, load_id: &LoadId) -> Result<Load, Error> {
        self.loads
            .find_by_id(load_id)
            .await
            .map_err(map_load_error)?
            .ok_or_else(|| Error::not_found("load not found"))
    }

    /// Whether the actor may confirm transit on this load: the owning
    /// shipper, or the trucker holding the load's accepted match.
    async fn authorize_transit_party(&self, actor: Identity, load: &Load) -> Result<(), Error> {
        match actor.role {
            Role::Shipper if load.shipper_id == actor.user_id => Ok(()),
            Role::Trucker => {
                let matched = self
                    .matches
                    .find_matched_for_load(&load.id)
                    .await
                    .map_err(map_match_error)?;
                if matched.is_some_and(|m| m.trucker_id == actor.user_id) {
                    Ok(())
                } else {
                    Err(Error::forbidden("you are not a party to this load"))
                }
            }
            _ => Err(Error::forbidden("you are not a party to this load")),
        }
    }
}

#[async_trait]
impl<L, M, U, G> LoadLifecycle for LoadLifecycleService<L, M, U, G>
where
    L: LoadRepository,
    M: MatchRepository,
    U: UserRepository,
    G: CancellationGateway,
{
    async fn create_load(&self, actor: Identity, draft: LoadDraft) -> Result<Load, Error> {
        if actor.role != Role::Shipper {
            return Err(Error::forbidden("only shippers can post loads"));
        }

        let today = self.clock.utc().date_naive();
        draft.validate(today).map_err(|error| {
            Error::invalid_request(error.to_string())
                .with_details(json!({ "field": error.field() }))
        })?;

        let load = Load::from_draft(actor.user_id, draft);
        self.loads.insert(&load).await.map_err(map_load_error)?;
        Ok(load)
    }

    async fn loads_for_shipper(&self, actor: Identity) -> Result<Vec<Load>, Error> {
        self.loads
            .list_by_shipper(&actor.user_id)
            .await
            .map_err(map_load_error)
    }

    async fn available_loads(&self, actor: Identity) -> Result<Vec<Load>, Error> {
        if actor.role != Role::Trucker {
            return Err(Error::forbidden("only truckers can view available loads"));
        }
        self.loads
            .list_available_for_trucker(&actor.user_id)
            .await
            .map_err(map_load_error)
    }

    async fn request_transit(&self, actor: Identity, load_id: LoadId) -> Result<Load, Error> {
        let load = self.fetch_load(&load_id).await?;
        self.authorize_transit_party(actor, &load).await?;

        if !load.status.can_transition_to(LoadStatus::InTransit) {
            return Err(Error::invalid_state(
                "load must be MATCHED before transit can start",
            ));
        }

        self.loads
            .confirm_transit(&load_id, actor.role)
            .await
            .map_err(map_load_error)?
            .ok_or_else(|| Error::conflict("load changed concurrently"))
    }

    async fn complete_load(&self, actor: Identity, load_id: LoadId) -> Result<Load, Error> {
        let load = self.fetch_load(&load_id).await?;
        if load.shipper_id != actor.user_id {
            return Err(Error::forbidden(
                "only the shipper can mark a load as COMPLETED",
            ));
        }
        if !load.status.can_transition_to(LoadStatus::Completed) {
            return Err(Error::invalid_state(
                "load must be IN_TRANSIT before it can be completed",
            ));
        }

        self.loads
            .complete(&load_id)
            .await
            .map_err(map_load_error)?
            .ok_or_else(|| Error::conflict("load changed concurrently"))
    }

    async fn cancel_load(
        &self,
        actor: Identity,
        load_id: LoadId,
    ) -> Result<CancellationReceipt, Error> {
        let load = self.fetch_load(&load_id).await?;
        if load.shipper_id != actor.user_id {
            return Err(Error::forbidden("only the shipper can cancel this load"));
        }
        if !load.status.can_transition_to(LoadStatus::Cancelled) {
            return Err(Error::invalid_state("only matched loads can be cancelled"));
        }

        let shipper = self
            .users
            .find_by_id(&actor.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("shipper not found"))?;

        if shipper.balance < CANCELLATION_FEE {
            return Err(
                Error::insufficient_funds("insufficient balance to pay the cancellation fee")
                    .with_details(json!({
                        "balance": shipper.balance.to_string(),
                        "fee": CANCELLATION_FEE.to_string(),
                    })),
            );
        }

        // The gateway re-validates both preconditions inside one atomic
        // transaction; fee debit and status change commit together or not
        // at all.
        let new_balance = self
            .settlement
            .cancel_with_fee(&load_id, &actor.user_id, CANCELLATION_FEE)
            .await
            .map_err(map_settlement_error)?;

        let load = Load {
            status: LoadStatus::Cancelled,
            ..load
        };
        Ok(CancellationReceipt { load, new_balance })
    }

    async fn delete_load(&self, actor: Identity, load_id: LoadId) -> Result<(), Error> {
        let load = self.fetch_load(&load_id).await?;
        if load.shipper_id != actor.user_id {
            return Err(Error::forbidden("only the shipper can delete this load"));
        }
        if load.status != LoadStatus::Pending {
            return Err(Error::invalid_state("only pending loads can be deleted"));
        }

        let deleted = self
            .loads
            .delete_pending(&load_id)
            .await
            .map_err(map_load_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::conflict("load changed concurrently"))
        }
    }
}
