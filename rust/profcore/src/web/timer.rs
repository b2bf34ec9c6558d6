//! BrowserScheduler: `Scheduler` over `setTimeout`/`clearTimeout`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::popup::{Scheduler, TimerToken};

struct ScheduledTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

pub struct BrowserScheduler {
    window: Window,
    on_fire: Rc<dyn Fn(TimerToken)>,
    timers: HashMap<TimerToken, ScheduledTimer>,
    /// Tokens whose callback already ran; their closures are dropped on the
    /// next schedule/cancel, never from inside the callback itself.
    fired: Rc<RefCell<Vec<TimerToken>>>,
}

impl BrowserScheduler {
    pub fn new(window: Window, on_fire: impl Fn(TimerToken) + 'static) -> Self {
        Self {
            window,
            on_fire: Rc::new(on_fire),
            timers: HashMap::new(),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    fn sweep(&mut self) {
        let fired: Vec<TimerToken> = self.fired.borrow_mut().drain(..).collect();
        for token in fired {
            self.timers.remove(&token);
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, token: TimerToken, delay_ms: u32) {
        self.sweep();

        let on_fire = self.on_fire.clone();
        let fired = self.fired.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            on_fire(token);
            fired.borrow_mut().push(token);
        });

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay)
        {
            Ok(handle) => {
                self.timers.insert(
                    token,
                    ScheduledTimer {
                        handle,
                        _callback: callback,
                    },
                );
            }
            Err(e) => console_error!("[BrowserScheduler] setTimeout failed: {:?}", e),
        }
    }

    fn cancel(&mut self, token: TimerToken) {
        self.sweep();
        if let Some(timer) = self.timers.remove(&token) {
            self.window.clear_timeout_with_handle(timer.handle);
        }
    }
}
