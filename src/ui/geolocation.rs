//! Browser geolocation for the "use my position" button

use crate::core::notice::GeolocationFailure;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// One high-accuracy position fix
#[cfg(feature = "hydrate")]
pub async fn current_position() -> Result<Position, GeolocationFailure> {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    use crate::core::notice::GEOLOCATION_TIMEOUT_MS;

    let geolocation = web_sys::window()
        .and_then(|w| w.navigator().geolocation().ok())
        .ok_or(GeolocationFailure::Unsupported)?;

    let (tx, rx) = oneshot::channel();
    let tx = Rc::new(RefCell::new(Some(tx)));

    // Owned by the browser: each frees itself when called, even if this future
    // has been dropped by then
    let on_success = {
        let tx = Rc::clone(&tx);
        Closure::once_into_js(move |position: web_sys::GeolocationPosition| {
            if let Some(tx) = tx.borrow_mut().take() {
                let coords = position.coords();
                let _ = tx.send(Ok(Position {
                    latitude: coords.latitude(),
                    longitude: coords.longitude(),
                }));
            }
        })
    };
    let on_error = Closure::once_into_js(move |error: web_sys::GeolocationPositionError| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(Err(GeolocationFailure::from_code(error.code())));
        }
    });

    let options = web_sys::PositionOptions::new();
    options.set_enable_high_accuracy(true);
    options.set_timeout(GEOLOCATION_TIMEOUT_MS);
    options.set_maximum_age(0);

    geolocation
        .get_current_position_with_error_callback_and_options(
            on_success.unchecked_ref(),
            Some(on_error.unchecked_ref()),
            &options,
        )
        .map_err(|_| GeolocationFailure::Unknown)?;

    rx.await.unwrap_or(Err(GeolocationFailure::Unknown))
}

#[cfg(not(feature = "hydrate"))]
pub async fn current_position() -> Result<Position, GeolocationFailure> {
    Err(GeolocationFailure::Unsupported)
}
