use async_graphql::MergedObject;

use crate::gql::domains::activity_log::ActivityLogQuery;
use crate::gql::domains::auth::AuthQuery;
use crate::gql::domains::bookings::BookingQuery;
use crate::gql::domains::calendar::CalendarQuery;
use crate::gql::domains::classes::ClassQuery;
use crate::gql::domains::clubs::ClubQuery;
use crate::gql::domains::users::UserQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    ActivityLogQuery,
    AuthQuery,
    BookingQuery,
    CalendarQuery,
    ClassQuery,
    ClubQuery,
    UserQuery,
);
