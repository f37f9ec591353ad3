use crate::data::subscription::SubscriptionRepository;
use crate::model::subscription::AggregationMode;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter};
use test_utils::{builder::TestBuilder, factory};

mod baseline;
mod configuration;
mod find_by_guild;
mod get_or_create;
