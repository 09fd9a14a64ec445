//! This module contains structs which represent the route configuration
//! options selected by the end user. In particular, the RouteConfig struct is
//! used widely across this package to inform the route creation process.

use crate::common::error::RouteError;
use geo::Point;
use serde::{Deserialize, Serialize};

/// Default average speed of a collection vehicle, in km/h
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 15.0;

/// Extra cost added to each category of turn while choosing the next street
/// in the circuit. Larger values make that kind of turn less attractive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnPenalties {
    pub straight: f64,
    pub right: f64,
    pub left: f64,
    pub u_turn: f64,
}

impl Default for TurnPenalties {
    fn default() -> Self {
        TurnPenalties {
            straight: 0.0,
            right: 0.0,
            left: 20.0,
            u_turn: 100.0,
        }
    }
}

impl TurnPenalties {
    /// All penalties must be finite and non-negative
    pub fn validate(&self) -> Result<(), RouteError> {
        let named = [
            ("straight", self.straight),
            ("right", self.right),
            ("left", self.left),
            ("u_turn", self.u_turn),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(RouteError::InvalidConfig(format!(
                    "{name} penalty must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Stores the user's requested route configuration exactly as it is received
/// from the API. Anything left out falls back to the defaults.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct UserRouteConfig {
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    #[serde(default)]
    pub ignore_oneway: bool,
    pub straight_penalty: Option<f64>,
    pub right_penalty: Option<f64>,
    pub left_penalty: Option<f64>,
    pub u_turn_penalty: Option<f64>,
    pub average_speed_kmh: Option<f64>,
}

impl TryFrom<UserRouteConfig> for RouteConfig {
    type Error = RouteError;

    fn try_from(user: UserRouteConfig) -> Result<RouteConfig, RouteError> {
        // A start point is only used when both halves are present
        let start = match (user.start_lat, user.start_lon) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat)
                    || !(-180.0..=180.0).contains(&lon)
                {
                    return Err(RouteError::InvalidConfig(format!(
                        "start point ({lat}, {lon}) is out of range"
                    )));
                }
                Some(Point::new(lon, lat))
            }
            _ => None,
        };

        let defaults = TurnPenalties::default();
        let penalties = TurnPenalties {
            straight: user.straight_penalty.unwrap_or(defaults.straight),
            right: user.right_penalty.unwrap_or(defaults.right),
            left: user.left_penalty.unwrap_or(defaults.left),
            u_turn: user.u_turn_penalty.unwrap_or(defaults.u_turn),
        };
        penalties.validate()?;

        let average_speed_kmh = user
            .average_speed_kmh
            .unwrap_or(DEFAULT_AVERAGE_SPEED_KMH);
        if !average_speed_kmh.is_finite() || average_speed_kmh <= 0.0 {
            return Err(RouteError::InvalidConfig(format!(
                "average speed must be positive, got {average_speed_kmh}"
            )));
        }

        Ok(RouteConfig {
            start: start,
            ignore_oneway: user.ignore_oneway,
            penalties: penalties,
            average_speed_kmh: average_speed_kmh,
        })
    }
}

/// Stores the user's requested route configuration in a format which can be
/// used in the rest of this package. Users are expected to create a
/// UserRouteConfig and use try_into() to get one of these, which validates
/// the provided values along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    pub start: Option<Point>,
    pub ignore_oneway: bool,
    pub penalties: TurnPenalties,
    pub average_speed_kmh: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            start: None,
            ignore_oneway: false,
            penalties: TurnPenalties::default(),
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}
