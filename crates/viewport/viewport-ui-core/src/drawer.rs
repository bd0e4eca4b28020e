//! Mobile navigation drawer.

use serde::{Deserialize, Serialize};

use crate::config::DrawerCfg;
use crate::ids::ElementId;
use crate::inputs::Key;
use crate::outputs::{Outputs, Target};
use crate::page::{Link, PageModel};
use crate::timers::{TimerQueue, TimerTask};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawerState {
    Closed,
    Open,
}

#[derive(Debug, Clone)]
pub struct DrawerController {
    hamburger: ElementId,
    drawer: ElementId,
    backdrop: ElementId,
    links: Vec<Link>,
    state: DrawerState,
    cfg: DrawerCfg,
}

impl DrawerController {
    pub fn new(page: &PageModel, cfg: DrawerCfg) -> Self {
        Self {
            hamburger: page.hamburger,
            drawer: page.drawer,
            backdrop: page.backdrop,
            links: page.drawer_links.clone(),
            state: DrawerState::Closed,
            cfg,
        }
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DrawerState::Open
    }

    pub fn open(&mut self, out: &mut Outputs) {
        self.state = DrawerState::Open;
        out.add_class(self.hamburger, "active");
        out.set_attribute(self.hamburger, "aria-expanded", "true");
        out.add_class(self.drawer, "open");
        out.add_class(self.backdrop, "visible");
        out.add_class(Target::Body, "drawer-open");
    }

    pub fn close(&mut self, out: &mut Outputs) {
        self.state = DrawerState::Closed;
        out.remove_class(self.hamburger, "active");
        out.set_attribute(self.hamburger, "aria-expanded", "false");
        out.remove_class(self.drawer, "open");
        out.remove_class(self.backdrop, "visible");
        out.remove_class(Target::Body, "drawer-open");
    }

    pub fn toggle(&mut self, out: &mut Outputs) {
        match self.state {
            DrawerState::Open => self.close(out),
            DrawerState::Closed => self.open(out),
        }
    }

    pub fn on_click(
        &mut self,
        el: ElementId,
        now: f64,
        page: &PageModel,
        timers: &mut TimerQueue,
        out: &mut Outputs,
    ) -> bool {
        if el == self.hamburger {
            self.toggle(out);
            return true;
        }
        if el == self.backdrop {
            self.close(out);
            return true;
        }
        let Some(href) = self
            .links
            .iter()
            .find(|l| l.element == el)
            .map(|l| l.href.clone())
        else {
            return false;
        };
        let target = page.resolve_fragment(&href);
        out.default_prevented = true;
        self.close(out);
        match target {
            Some(element) => timers.schedule(
                now + self.cfg.scroll_delay_ms,
                TimerTask::DrawerScroll { element },
            ),
            None => log::debug!("drawer link target '{href}' not on page"),
        }
        true
    }

    pub fn on_key(&mut self, key: &Key, out: &mut Outputs) {
        if *key == Key::Escape && self.is_open() {
            self.close(out);
        }
    }

    pub fn on_resize(&mut self, width: f64, out: &mut Outputs) {
        if width >= self.cfg.desktop_breakpoint_px && self.is_open() {
            self.close(out);
        }
    }
}
