use std::time::Duration;

use leptos::prelude::*;

/// Oldest notices are dropped beyond this many.
const MAX_VISIBLE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
	Info,
	Destructive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
	pub id: u64,
	pub title: String,
	pub description: String,
	pub kind: NoticeKind,
}

#[derive(Clone, Debug, Default)]
pub struct ToastQueue {
	notices: Vec<Notice>,
	next_id: u64,
}

impl ToastQueue {
	pub fn push(&mut self, title: String, description: String, kind: NoticeKind) -> u64 {
		let id = self.next_id;
		self.next_id += 1;
		self.notices.push(Notice {
			id,
			title,
			description,
			kind,
		});
		if self.notices.len() > MAX_VISIBLE {
			self.notices.remove(0);
		}
		id
	}

	pub fn dismiss(&mut self, id: u64) {
		self.notices.retain(|n| n.id != id);
	}

	pub fn notices(&self) -> &[Notice] {
		&self.notices
	}
}

/// Handle for raising transient notifications; shared through context.
#[derive(Clone, Copy)]
pub struct Toasts {
	queue: RwSignal<ToastQueue>,
	duration: Duration,
}

impl Toasts {
	fn push(&self, title: String, description: String, kind: NoticeKind) {
		let Some(id) = self.queue.try_update(|q| q.push(title, description, kind)) else {
			return;
		};
		let queue = self.queue;
		set_timeout(
			move || {
				queue.try_update(|q| q.dismiss(id));
			},
			self.duration,
		);
	}

	pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
		self.push(title.into(), description.into(), NoticeKind::Info);
	}

	pub fn error(&self, description: impl Into<String>) {
		self.push("Error".into(), description.into(), NoticeKind::Destructive);
	}
}

pub fn provide_toasts(duration: Duration) -> Toasts {
	let toasts = Toasts {
		queue: RwSignal::new(ToastQueue::default()),
		duration,
	};
	provide_context(toasts);
	toasts
}

pub fn use_toasts() -> Toasts {
	expect_context::<Toasts>()
}

#[component]
pub fn Toaster() -> impl IntoView {
	let toasts = use_toasts();
	let queue = toasts.queue;

	view! {
		<ol class="toaster">
			<For
				each=move || queue.with(|q| q.notices().to_vec())
				key=|notice| notice.id
				children=move |notice: Notice| {
					let id = notice.id;
					view! {
						<li
							class="toast"
							class:destructive=notice.kind == NoticeKind::Destructive
							on:click=move |_| queue.update(|q| q.dismiss(id))
						>
							<div class="toast-title">{notice.title}</div>
							<div class="toast-description">{notice.description}</div>
						</li>
					}
				}
			/>
		</ol>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn queue_keeps_newest_notices() {
		let mut queue = ToastQueue::default();
		let first = queue.push("a".into(), String::new(), NoticeKind::Info);
		for title in ["b", "c", "d"] {
			queue.push(title.into(), String::new(), NoticeKind::Info);
		}
		let titles: Vec<_> = queue.notices().iter().map(|n| n.title.as_str()).collect();
		assert_eq!(titles, ["b", "c", "d"]);

		queue.dismiss(first);
		assert_eq!(queue.notices().len(), 3);
		let last = queue.notices()[2].id;
		queue.dismiss(last);
		assert_eq!(queue.notices().len(), 2);
	}
}
