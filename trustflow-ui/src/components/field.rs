//! Campaign Field
//!
//! Every campaign field is its own request with its own placeholder. A slow
//! or failing read never holds back the fields around it.

use leptos::*;
use serde::de::DeserializeOwned;

use crate::api::{self, ClientError, Field, FieldReading};
use crate::components::loading::{FieldSkeleton, Unavailable};

pub type FieldResource<T> = Resource<u32, Result<FieldReading<T>, ClientError>>;

/// Resource for one field. Bumping `version` reads it again.
pub fn use_campaign_field<T>(
    address: String,
    field: &'static str,
    version: Option<ReadSignal<u32>>,
) -> FieldResource<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    create_local_resource(
        move || version.map(|v| v.get()).unwrap_or_default(),
        move |_| {
            let address = address.clone();
            async move { api::fetch_field::<T>(&address, field).await }
        },
    )
}

/// The loaded value, if the read succeeded
pub fn field_value<T: Clone>(resource: FieldResource<T>) -> Option<T> {
    resource
        .get()
        .and_then(|result| result.ok())
        .and_then(|reading| reading.value().cloned())
}

/// One field rendered as text. `render` gets the value and the server's
/// label, when the field has one.
pub fn live_field<T, F>(
    address: String,
    field: &'static str,
    version: Option<ReadSignal<u32>>,
    render: F,
) -> impl IntoView
where
    T: DeserializeOwned + Clone + 'static,
    F: Fn(&T, Option<&str>) -> String + 'static,
{
    let reading = use_campaign_field::<T>(address, field, version);

    view! {
        <Transition fallback=move || view! { <FieldSkeleton /> }>
            {move || reading.get().map(|result| match result {
                Ok(FieldReading { reading: Field::Ok { value }, label, .. }) => {
                    view! { <span>{render(&value, label.as_deref())}</span> }.into_view()
                }
                Ok(FieldReading { reading: Field::Unavailable { error }, .. }) => {
                    view! { <Unavailable error=error /> }.into_view()
                }
                Err(e) => view! { <Unavailable error=e.to_string() /> }.into_view(),
            })}
        </Transition>
    }
}

/// Funding progress bar, fed by the `progress` field
#[component]
pub fn ProgressBar(
    address: String,
    #[prop(optional)] version: Option<ReadSignal<u32>>,
    #[prop(default = "h-2")] height: &'static str,
) -> impl IntoView {
    let progress = use_campaign_field::<f64>(address, "progress", version);
    let width = move || crate::format::progress_width(field_value(progress));

    view! {
        <div class=format!("w-full bg-gray-700 rounded-full {}", height)>
            <div
                class=format!("bg-primary-500 rounded-full {}", height)
                style=move || format!("width: {}", width())
            />
        </div>
    }
}
