use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::access::AccessScope;
use crate::domain::booking::{Booking, BookingListQuery, BookingStatus, UpdateBooking};
use crate::domain::branch::Branch;
use crate::domain::wash_service::{WashService, WashServiceListQuery};
use crate::domain::washer::{Washer, WasherListQuery};
use crate::forms::bookings::{AddBookingForm, AssignWasherForm, BookingStatusForm};
use crate::repository::{
    AdminReader, BookingReader, BookingWriter, BranchReader, WashServiceReader, WasherReader,
};
use crate::services::access::{ensure_branch_access, resolve_scope};
use crate::services::branches::list_accessible_branches;
use crate::services::{ServiceError, ServiceResult, day_range, query_date};

/// Filters accepted by the bookings page and the bookings API.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookingsQuery {
    /// Customer name, phone or plate.
    pub search: Option<String>,
    pub page: Option<usize>,
    pub status: Option<String>,
    pub branch_id: Option<i32>,
    /// First day, `YYYY-MM-DD`, inclusive.
    pub from: Option<String>,
    /// Last day, `YYYY-MM-DD`, inclusive.
    pub to: Option<String>,
}

impl BookingsQuery {
    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    fn status(&self) -> Option<BookingStatus> {
        self.status.as_deref().and_then(|value| value.parse().ok())
    }

    fn into_list_query(self, hub_id: i32, scope: &AccessScope) -> ServiceResult<BookingListQuery> {
        let mut query = BookingListQuery::new(hub_id).restrict_to(scope.branch_filter());

        if let Some(term) = self.search_term() {
            query = query.search(term);
        }
        if let Some(status) = self.status() {
            query = query.status(status);
        }
        if let Some(branch_id) = self.branch_id {
            ensure_branch_access(scope, branch_id)?;
            query = query.branch(branch_id);
        }

        let (from, to) = day_range(
            query_date(self.from.as_deref()),
            query_date(self.to.as_deref()),
        );
        if from.is_some() || to.is_some() {
            query = query.between(from, to);
        }

        Ok(query)
    }
}

pub struct BookingsPageData {
    pub bookings: Paginated<Booking>,
    pub branches: Vec<Branch>,
    pub services: Vec<WashService>,
    pub washers: Vec<Washer>,
    pub status: Option<BookingStatus>,
    pub search: Option<String>,
}

/// One page of bookings visible to the user along with the total count.
pub fn list_bookings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BookingsQuery,
) -> ServiceResult<(usize, Vec<Booking>)>
where
    R: AdminReader + BranchReader + BookingReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    list_scoped_bookings(repo, user.hub_id, &scope, query)
}

fn list_scoped_bookings<R>(
    repo: &R,
    hub_id: i32,
    scope: &AccessScope,
    query: BookingsQuery,
) -> ServiceResult<(usize, Vec<Booking>)>
where
    R: BookingReader + ?Sized,
{
    let page = query.page.unwrap_or(1).max(1);
    let list_query = query
        .into_list_query(hub_id, scope)?
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    repo.list_bookings(list_query).map_err(ServiceError::from)
}

pub fn load_bookings_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BookingsQuery,
) -> ServiceResult<BookingsPageData>
where
    R: AdminReader + BranchReader + BookingReader + WashServiceReader + WasherReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let page = query.page.unwrap_or(1).max(1);
    let status = query.status();
    let search = query.search_term().map(str::to_string);

    let (total, bookings) = list_scoped_bookings(repo, user.hub_id, &scope, query)?;

    let branches = list_accessible_branches(repo, user.hub_id, &scope)?;
    let services = repo
        .list_services(WashServiceListQuery::new(user.hub_id).restrict_to(scope.branch_filter()))
        .map_err(ServiceError::from)?;
    let (_, washers) = repo
        .list_washers(WasherListQuery::new(user.hub_id).restrict_to(scope.branch_filter()))
        .map_err(ServiceError::from)?;

    Ok(BookingsPageData {
        bookings: Paginated::new(bookings, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        branches,
        services,
        washers,
        status,
        search,
    })
}

fn get_accessible_booking<R>(
    repo: &R,
    user: &AuthenticatedUser,
    booking_id: i32,
) -> ServiceResult<Booking>
where
    R: AdminReader + BranchReader + BookingReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let booking = repo
        .get_booking_by_id(booking_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    ensure_branch_access(&scope, booking.branch_id)?;
    Ok(booking)
}

/// Checks that the washer exists and works at `branch_id`.
fn ensure_washer_in_branch<R>(repo: &R, hub_id: i32, washer_id: i32, branch_id: i32) -> ServiceResult<()>
where
    R: WasherReader + ?Sized,
{
    match repo.get_washer_by_id(washer_id, hub_id).map_err(ServiceError::from)? {
        Some(washer) if washer.branch_id == branch_id => Ok(()),
        Some(_) => Err(ServiceError::Form(
            "the washer works at another branch".to_string(),
        )),
        None => Err(ServiceError::Form(format!("washer {washer_id} does not exist"))),
    }
}

/// Creates a booking. Without an explicit price the service price is captured.
pub fn create_booking<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddBookingForm,
) -> ServiceResult<Booking>
where
    R: AdminReader
        + BranchReader
        + BookingWriter
        + WashServiceReader
        + WasherReader
        + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let payload = form
        .into_new_booking(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let mut booking = payload.booking;
    ensure_branch_access(&scope, booking.branch_id)?;

    let service = match booking.service_id {
        Some(service_id) => {
            let service = repo
                .get_service_by_id(service_id, user.hub_id)
                .map_err(ServiceError::from)?
                .ok_or_else(|| ServiceError::Form(format!("service {service_id} does not exist")))?;
            if service.branch_id != booking.branch_id {
                return Err(ServiceError::Form(
                    "the service is offered by another branch".to_string(),
                ));
            }
            Some(service)
        }
        None => None,
    };

    if let Some(washer_id) = booking.washer_id {
        ensure_washer_in_branch(repo, user.hub_id, washer_id, booking.branch_id)?;
    }

    booking.price_cents = match (payload.price_cents, &service) {
        (Some(price_cents), _) => price_cents,
        (None, Some(service)) => service.price_cents,
        (None, None) => {
            return Err(ServiceError::Form(
                "enter a price or choose a service".to_string(),
            ));
        }
    };

    let created = repo.create_booking(&booking).map_err(ServiceError::from)?;
    log::info!("Created booking {} at branch {}", created.id, created.branch_id);
    Ok(created)
}

/// Moves a booking along its workflow.
pub fn change_booking_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BookingStatusForm,
) -> ServiceResult<Booking>
where
    R: AdminReader + BranchReader + BookingReader + BookingWriter + ?Sized,
{
    let (booking_id, status) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let booking = get_accessible_booking(repo, user, booking_id)?;

    if !booking.status.can_transition_to(status) {
        return Err(ServiceError::Conflict(format!(
            "a {} booking cannot become {}",
            booking.status.as_str(),
            status.as_str()
        )));
    }

    repo.update_booking(booking_id, user.hub_id, &UpdateBooking::new().status(status))
        .map_err(ServiceError::from)
}

pub fn assign_washer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AssignWasherForm,
) -> ServiceResult<Booking>
where
    R: AdminReader + BranchReader + BookingReader + BookingWriter + WasherReader + ?Sized,
{
    let (booking_id, washer_id) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let booking = get_accessible_booking(repo, user, booking_id)?;

    if booking.status.is_terminal() {
        return Err(ServiceError::Conflict(format!(
            "a {} booking cannot be reassigned",
            booking.status.as_str()
        )));
    }
    if let Some(washer_id) = washer_id {
        ensure_washer_in_branch(repo, user.hub_id, washer_id, booking.branch_id)?;
    }

    repo.update_booking(booking_id, user.hub_id, &UpdateBooking::new().washer_id(washer_id))
        .map_err(ServiceError::from)
}

pub fn remove_booking<R>(repo: &R, user: &AuthenticatedUser, booking_id: i32) -> ServiceResult<()>
where
    R: AdminReader + BranchReader + BookingReader + BookingWriter + ?Sized,
{
    get_accessible_booking(repo, user, booking_id)?;

    repo.delete_booking(booking_id, user.hub_id)
        .map_err(ServiceError::from)
}
