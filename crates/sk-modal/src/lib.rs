//! Tab-modal dialog ordering and host input blocking.
//!
//! Dialogs attached to one host surface form a queue. Only the front dialog is
//! ever shown; the rest wait until everything in front of them has closed.
//! While any dialog is open the host ignores input.
//!
//! Closing is split into a command and an event: [`DialogPlatform::close`]
//! asks the UI layer to close a dialog, and the UI layer later reports the
//! completion through [`ModalDialogStack::will_close`].

use core::fmt;
use sk_core::ShellError;
use sk_core::ShellResult;

/// UI-toolkit side of a dialog. All calls are fire-and-forget.
pub trait DialogPlatform<H> {
    /// Called once when a dialog joins the stack, before it may be shown.
    fn manage(&mut self, _dialog: H) {}

    fn show(&mut self, dialog: H);

    fn hide(&mut self, dialog: H);

    /// Requests a close; completion arrives via [`ModalDialogStack::will_close`].
    fn close(&mut self, dialog: H);

    fn focus(&mut self, dialog: H);
}

/// The surface dialogs are attached to.
pub trait HostDelegate {
    fn is_host_visible(&self) -> bool;

    fn set_input_blocked(&mut self, blocked: bool);
}

/// What [`ModalDialogStack::show`] does with a dialog already in the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateShowPolicy {
    /// Leave the stack unchanged and log a warning.
    #[default]
    Ignore,
    /// Bring the existing entry to the front and show it.
    MoveToFront,
}

/// A dialog tracked by the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogEntry<H> {
    pub dialog: H,
    pub prevent_close_on_navigation: bool,
}

impl<H> DialogEntry<H> {
    fn new(dialog: H) -> Self {
        Self {
            dialog,
            prevent_close_on_navigation: false,
        }
    }
}

/// Ordered modal dialogs of one host surface. The first entry is the front.
pub struct ModalDialogStack<H, P, D> {
    dialogs: Vec<DialogEntry<H>>,
    platform: P,
    delegate: D,
    duplicate_policy: DuplicateShowPolicy,
    closing_all: bool,
}

impl<H: fmt::Debug, P, D> fmt::Debug for ModalDialogStack<H, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalDialogStack")
            .field("dialogs", &self.dialogs)
            .field("duplicate_policy", &self.duplicate_policy)
            .field("closing_all", &self.closing_all)
            .finish_non_exhaustive()
    }
}

impl<H, P, D> ModalDialogStack<H, P, D>
where
    H: Copy + Eq + fmt::Debug,
    P: DialogPlatform<H>,
    D: HostDelegate,
{
    pub fn new(platform: P, delegate: D) -> Self {
        Self {
            dialogs: Vec::new(),
            platform,
            delegate,
            duplicate_policy: DuplicateShowPolicy::default(),
            closing_all: false,
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicateShowPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn is_showing_dialog(&self) -> bool {
        !self.dialogs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// The dialog currently shown (or shown once the host becomes visible).
    pub fn front(&self) -> Option<H> {
        self.dialogs.first().map(|entry| entry.dialog)
    }

    pub fn entries(&self) -> &[DialogEntry<H>] {
        &self.dialogs
    }

    /// Adds `dialog` behind any dialogs already open.
    pub fn show(&mut self, dialog: H) {
        if let Some(index) = self.position(dialog) {
            self.show_duplicate(index);
            return;
        }

        self.dialogs.push(DialogEntry::new(dialog));
        self.platform.manage(dialog);

        if self.dialogs.len() == 1 {
            if self.delegate.is_host_visible() {
                self.platform.show(dialog);
            }
            self.delegate.set_input_blocked(true);
        }
        log::debug!("modal dialog {dialog:?} queued at depth {}", self.dialogs.len());
    }

    /// Keeps `dialog` open across navigations when `prevent` is set.
    ///
    /// Only the front dialog's flag is ever consulted.
    pub fn set_prevent_close_on_navigation(&mut self, dialog: H, prevent: bool) -> ShellResult<()> {
        let Some(index) = self.position(dialog) else {
            log::error!("prevent-close requested for unknown modal dialog {dialog:?}");
            return Err(ShellError::new(
                "modal.dialog_unknown",
                format!("dialog {dialog:?} is not managed by this stack"),
            ));
        };

        self.dialogs[index].prevent_close_on_navigation = prevent;
        Ok(())
    }

    /// Handles the UI layer's notification that `dialog` is closing.
    ///
    /// Repeated notifications for the same dialog are ignored.
    pub fn will_close(&mut self, dialog: H) {
        let Some(index) = self.position(dialog) else {
            log::trace!("ignoring close of unmanaged modal dialog {dialog:?}");
            return;
        };

        self.dialogs.remove(index);
        if index == 0 && !self.closing_all {
            if let Some(next) = self.front() {
                self.platform.show(next);
            }
        }

        self.delegate.set_input_blocked(!self.dialogs.is_empty());
        log::debug!(
            "modal dialog {dialog:?} closed, {} remaining",
            self.dialogs.len()
        );
    }

    pub fn on_host_visibility_changed(&mut self, visible: bool) {
        let Some(front) = self.front() else {
            return;
        };

        if visible {
            self.platform.show(front);
        } else {
            self.platform.hide(front);
        }
    }

    /// A new page load started in the host.
    pub fn on_navigation_started(&mut self) {
        if let Some(entry) = self.dialogs.first() {
            if !entry.prevent_close_on_navigation {
                self.platform.close(entry.dialog);
            }
        }
    }

    /// Closes every dialog without revealing the ones behind the front.
    pub fn close_all(&mut self) {
        self.closing_all = true;

        while let Some(front) = self.front() {
            self.platform.close(front);
            // The platform's own notification may arrive later; it is then a
            // duplicate and ignored.
            self.will_close(front);
        }

        self.closing_all = false;
    }

    /// Callers must check [`Self::is_showing_dialog`] first.
    pub fn focus_topmost(&mut self) -> ShellResult<()> {
        debug_assert!(
            !self.dialogs.is_empty(),
            "focus_topmost called without a modal dialog"
        );

        let Some(front) = self.front() else {
            log::error!("focus_topmost called without a modal dialog");
            return Err(ShellError::new(
                "modal.stack_empty",
                "no modal dialog to focus",
            ));
        };

        self.platform.focus(front);
        Ok(())
    }

    /// Input aimed at the blocked host is redirected to the front dialog.
    pub fn on_ignored_input(&mut self) {
        if let Some(front) = self.front() {
            self.platform.focus(front);
        }
    }

    /// The host surface is going away.
    pub fn on_host_destroyed(&mut self) {
        self.close_all();
    }

    fn position(&self, dialog: H) -> Option<usize> {
        self.dialogs.iter().position(|entry| entry.dialog == dialog)
    }

    fn show_duplicate(&mut self, index: usize) {
        let dialog = self.dialogs[index].dialog;
        match self.duplicate_policy {
            DuplicateShowPolicy::Ignore => {
                log::warn!("modal dialog {dialog:?} shown twice; ignoring");
            }
            DuplicateShowPolicy::MoveToFront => {
                if index == 0 {
                    return;
                }

                // A hidden host never showed the previous front.
                let visible = self.delegate.is_host_visible();
                if visible {
                    if let Some(previous) = self.front() {
                        self.platform.hide(previous);
                    }
                }
                let entry = self.dialogs.remove(index);
                self.dialogs.insert(0, entry);
                if visible {
                    self.platform.show(dialog);
                }
                log::debug!("modal dialog {dialog:?} moved to front");
            }
        }
    }
}
