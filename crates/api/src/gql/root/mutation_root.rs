use async_graphql::MergedObject;

use crate::gql::domains::auth::AuthMutation;
use crate::gql::domains::bookings::BookingMutation;
use crate::gql::domains::classes::ClassMutation;
use crate::gql::domains::clubs::ClubMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutation, BookingMutation, ClassMutation, ClubMutation);
