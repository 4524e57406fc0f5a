//! Sample data for development and demos.
//!
//! Five trips between Brazilian cities, dated relative to a given day, plus
//! a small gazetteer for running without a live geocoding provider.

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::domain::{
    Coordinates, Driver, InvalidCoordinates, InvalidLocation, InvalidTrip, Location, Trip, TripId,
    TripOffer, parse_time,
};
use crate::geocode::MockGeocoder;

/// Error building the sample data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeedError {
    #[error("invalid sample location: {0}")]
    Location(#[from] InvalidLocation),

    #[error("invalid sample position: {0}")]
    Coordinates(#[from] InvalidCoordinates),

    #[error("invalid sample trip: {0}")]
    Trip(#[from] InvalidTrip),
}

struct City {
    name: &'static str,
    lat: f64,
    lng: f64,
    rank: f64,
}

impl City {
    const fn new(name: &'static str, lat: f64, lng: f64, rank: f64) -> Self {
        Self {
            name,
            lat,
            lng,
            rank,
        }
    }

    fn location(&self) -> Result<Location, InvalidLocation> {
        Location::parse(self.name, self.lat, self.lng)
    }
}

const SAO_PAULO: City = City::new("São Paulo, SP, Brasil", -23.5505, -46.6333, 0.9);
const RIO: City = City::new("Rio de Janeiro, RJ, Brasil", -22.9068, -43.1729, 0.9);
const BELO_HORIZONTE: City = City::new("Belo Horizonte, MG, Brasil", -19.9167, -43.9345, 0.8);
const VITORIA: City = City::new("Vitória, ES, Brasil", -20.3155, -40.3378, 0.7);
const CURITIBA: City = City::new("Curitiba, PR, Brasil", -25.4284, -49.2733, 0.8);
const FLORIANOPOLIS: City = City::new("Florianópolis, SC, Brasil", -27.5954, -48.548, 0.7);
const CAMPINAS: City = City::new("Campinas, SP, Brasil", -22.9099, -47.0626, 0.6);
const BRASILIA: City = City::new("Brasília, DF, Brasil", -15.7939, -47.8828, 0.8);

const CITIES: [&City; 8] = [
    &SAO_PAULO,
    &RIO,
    &BELO_HORIZONTE,
    &VITORIA,
    &CURITIBA,
    &FLORIANOPOLIS,
    &CAMPINAS,
    &BRASILIA,
];

fn avatar(seed: &str) -> String {
    format!("https://picsum.photos/seed/{seed}/100/100")
}

/// The driver attached to trips offered through the API.
pub fn guest_driver() -> Result<Driver, SeedError> {
    Ok(Driver::new("user-0", "Você", avatar("you"), 5.0)?)
}

fn sample_drivers() -> Result<[Arc<Driver>; 4], SeedError> {
    Ok([
        Arc::new(Driver::new("user-1", "Ana Silva", avatar("ana"), 4.8)?),
        Arc::new(Driver::new("user-2", "Bruno Costa", avatar("bruno"), 4.9)?),
        Arc::new(Driver::new("user-3", "Carla Dias", avatar("carla"), 5.0)?),
        Arc::new(Driver::new("user-4", "Daniel Alves", avatar("daniel"), 4.7)?),
    ])
}

/// The sample trip collection, newest-listed first.
///
/// Dates are `today`, `today + 1` and `today + 2`, so the listing always
/// looks current.
pub fn sample_trips(today: NaiveDate) -> Result<Vec<Trip>, SeedError> {
    let [ana, bruno, carla, daniel] = sample_drivers()?;
    let day = |offset: u64| today.checked_add_days(Days::new(offset)).unwrap_or(today);

    let trip = |id: &str,
                from: &City,
                to: &City,
                date: NaiveDate,
                time: &str,
                price: u32,
                seats: u8,
                driver: &Arc<Driver>|
     -> Result<Trip, SeedError> {
        let offer = TripOffer::new(
            from.location()?,
            to.location()?,
            date,
            parse_time(time)?,
            price,
            seats,
        )?;
        Ok(Trip::from_offer(TripId::new(id), offer, Arc::clone(driver)))
    };

    Ok(vec![
        trip("trip-1", &SAO_PAULO, &RIO, day(0), "08:00", 120, 2, &ana)?,
        trip("trip-2", &BELO_HORIZONTE, &VITORIA, day(0), "07:30", 90, 1, &bruno)?,
        trip("trip-3", &CURITIBA, &FLORIANOPOLIS, day(1), "14:00", 0, 3, &carla)?,
        trip("trip-4", &SAO_PAULO, &CAMPINAS, day(2), "18:00", 30, 2, &daniel)?,
        trip("trip-5", &RIO, &SAO_PAULO, day(1), "09:00", 110, 1, &carla)?,
    ])
}

/// A mock geocoder that knows every city used by the sample trips.
pub fn sample_geocoder() -> Result<MockGeocoder, SeedError> {
    CITIES.iter().try_fold(MockGeocoder::new(), |mock, city| {
        let coordinates = Coordinates::new(city.lat, city.lng)?;
        Ok(mock.with_named_place(city.name, coordinates, city.rank))
    })
}
