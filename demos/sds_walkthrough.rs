use sds_client::prelude::*;
use serde::{Deserialize, Serialize};
use log::info;

const TYPE_ID: &str = "SampleType";
const TARGET_INT_TYPE_ID: &str = "SampleType_TargetInt";
const STREAM_ID: &str = "SampleStream";
const STREAM_VIEW_ID: &str = "SampleManualStreamView";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WaveData {
    order: i32,
    radians: f64,
    sin: f64,
    cos: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WaveDataInteger {
    order_target: i32,
    sin_int: i32,
    cos_int: i32,
}

fn wave(order: i32, multiplier: f64) -> WaveData {
    let radians = order as f64 * std::f64::consts::PI / 32.0;
    WaveData {
        order,
        radians,
        sin: multiplier * radians.sin(),
        cos: multiplier * radians.cos(),
    }
}

fn print_map(map: &SdsStreamViewMap) {
    for property in map.properties().unwrap_or_default() {
        println!(
            "   {} => {} (mode {})",
            property.source_id.as_deref().unwrap_or("-"),
            property.target_id.as_deref().unwrap_or("Not mapped"),
            property.mode.0
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = std::env::args().nth(1).unwrap_or_else(|| "appsettings.json".to_string());
    let config = SdsConfig::from_file(&settings)?;
    let namespace = config.namespace_id.as_str();

    println!("🧪 SDS Walkthrough");
    println!("==================");
    println!("Sds endpoint at {}", config.resource);

    let client = BaseClient::from_config(&config).await?;

    println!("\n1. 📐 Creating types...");
    let double = || SdsType::primitive(SdsTypeCode::DOUBLE);
    let int = || SdsType::primitive(SdsTypeCode::INT32);
    let wave_type = SdsType::object(
        TYPE_ID,
        vec![
            SdsTypeProperty::new("Order", int()).key(),
            SdsTypeProperty::new("Radians", double()),
            SdsTypeProperty::new("Sin", double()),
            SdsTypeProperty::new("Cos", double()),
        ],
    );
    let target_type = SdsType::object(
        TARGET_INT_TYPE_ID,
        vec![
            SdsTypeProperty::new("OrderTarget", int()).key(),
            SdsTypeProperty::new("SinInt", int()),
            SdsTypeProperty::new("CosInt", int()),
        ],
    );
    client.types().get_or_create_type(namespace, &wave_type).await?;
    client.types().get_or_create_type(namespace, &target_type).await?;

    println!("\n2. 🌊 Creating stream and inserting data...");
    let stream = client
        .streams()
        .get_or_create_stream(namespace, &SdsStream::new(STREAM_ID, TYPE_ID))
        .await?;
    let waves: Vec<WaveData> = (0..10).map(|i| wave(i * 2, 2.0)).collect();
    client.data().insert_values(namespace, STREAM_ID, &waves).await?;

    let last: Option<WaveData> = client.data().get_last_value(namespace, STREAM_ID).await?;
    println!("   Latest event: {:?}", last);

    let window: Vec<WaveData> = client
        .data()
        .get_window_values(namespace, STREAM_ID, "0", "180")
        .await?;
    println!("   Total events found: {}", window.len());

    println!("\n3. 🔀 Creating stream view...");
    let view = SdsStreamView::new(STREAM_VIEW_ID, TYPE_ID, TARGET_INT_TYPE_ID).with_properties(vec![
        SdsStreamViewProperty::new("Order", "OrderTarget"),
        SdsStreamViewProperty::new("Sin", "SinInt"),
        SdsStreamViewProperty::new("Cos", "CosInt"),
    ]);
    client.stream_views().create_or_update_stream_view(namespace, &view).await?;

    let mapped: Vec<WaveDataInteger> = client
        .data()
        .get_range_values(
            namespace,
            STREAM_ID,
            "1",
            0,
            3,
            false,
            SdsBoundaryType::ExactOrCalculated,
            Some(STREAM_VIEW_ID),
        )
        .await?;
    for value in &mapped {
        println!("   Order: {} SinInt: {} CosInt: {}", value.order_target, value.sin_int, value.cos_int);
    }

    let map = client.stream_views().get_stream_view_map(namespace, STREAM_VIEW_ID).await?;
    println!("   Stream view map {}:", map.to_json()?);
    print_map(&map);

    println!("\n4. 🧹 Cleaning up...");
    client.data().remove_window_values(namespace, STREAM_ID, "0", "200").await?;
    if let Some(id) = stream.id.as_deref() {
        client.streams().delete_stream(namespace, id).await?;
    }
    client.stream_views().delete_stream_view(namespace, STREAM_VIEW_ID).await?;
    client.types().delete_type(namespace, TARGET_INT_TYPE_ID).await?;
    client.types().delete_type(namespace, TYPE_ID).await?;
    info!("Walkthrough finished");

    println!("\n✅ Done");
    Ok(())
}
