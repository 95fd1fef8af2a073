use std::rc::Rc;

pub const LOGIN: &str = "/";
pub const BILLS: &str = "#employee/bills";
pub const NEW_BILL: &str = "#employee/bill/new";
pub const DASHBOARD: &str = "#admin/dashboard";

/// Navigation callback handed to the pages
pub type Navigate = Rc<dyn Fn(&str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => LOGIN,
            Route::Bills => BILLS,
            Route::NewBill => NEW_BILL,
            Route::Dashboard => DASHBOARD,
        }
    }

    /// Unknown paths resolve to the login route
    pub fn from_path(path: &str) -> Route {
        match path {
            BILLS => Route::Bills,
            NEW_BILL => Route::NewBill,
            DASHBOARD => Route::Dashboard,
            _ => Route::Login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_round_trip() {
        for route in [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("#nowhere"), Route::Login);
        assert_eq!(Route::from_path(""), Route::Login);
    }
}
