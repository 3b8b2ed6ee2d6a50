//! End-to-end brochure generation tests
//!
//! Image fixtures are served from a throwaway local HTTP server so the
//! full fetch -> decode -> embed -> place path runs; fetch-failure cases
//! point at a connection-refused port. Page structure is asserted on the
//! uncompressed pdf-writer output.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use brochure_renderer::{BrochureRenderer, FontSet, Language, PropertyRecord};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use serde_json::json;

fn renderer() -> BrochureRenderer {
    BrochureRenderer::with_fonts(FontSet::empty(), None).unwrap()
}

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, 64]);
    }
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Serve `body` as image/png for up to `requests` GETs, returning the base URL
fn serve_png(body: Vec<u8>, requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for _ in 0..requests {
            let Ok((mut stream, _)) = listener.accept() else { break };
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
        }
    });
    format!("http://{}", addr)
}

fn full_property(image_urls: Vec<String>) -> PropertyRecord {
    serde_json::from_value(json!({
        "title": "Grand Palm Villa",
        "description": "Base description text.",
        "price": 550000.0,
        "currency": "Dollar",
        "address": "123 Main St",
        "city": "Springfield",
        "state": "",
        "zipCode": "12345",
        "amenities": [
            "Pool", "Gym", "Sauna", "Covered parking", "Concierge",
            "Playground", "BBQ area", "Smart locks", "Storage", "Garden"
        ],
        "imageUrls": image_urls,
        "agentInfo": {
            "name": "Lina Haddad",
            "email": "lina@agency.example",
            "phone": "+971 50 000 0000"
        },
        "aiContent": {
            "englishDescription": "Legacy english description.",
            "arabicDescription": "وصف قديم للعقار",
            "keyHighlights": ["• Sea view", "- Private elevator"]
        },
        "englishContent": {
            "title": "Grand Palm Villa",
            "description": "A five-bedroom villa on the palm with private beach access and panoramic sea views from every floor.",
            "highlights": [
                "• Private beach access",
                "- Panoramic sea views",
                "-> Infinity pool",
                "* Smart home throughout",
                "• Double-height majlis",
                "• Staff quarters"
            ],
            "amenities": [
                "Pool", "Gym", "Sauna", "Covered parking", "Concierge",
                "Playground", "BBQ area", "Smart locks", "Storage", "Garden"
            ],
            "priceLabel": "Price",
            "addressLabel": "Address",
            "cityLabel": "City",
            "stateLabel": "State",
            "zipCodeLabel": "ZIP Code",
            "amenitiesLabel": "Amenities & Features",
            "agentLabel": "Contact Your Agent",
            "propertyDescriptionLabel": "Property Description",
            "keyHighlightsLabel": "Key Highlights",
            "propertyGalleryLabel": "Property Gallery"
        },
        "arabicContent": {
            "title": "فيلا النخلة الكبرى",
            "description": "فيلا من خمس غرف نوم على النخلة مع شاطئ خاص وإطلالات بحرية بانورامية من كل طابق.",
            "highlights": [
                "• شاطئ خاص",
                "• إطلالات بحرية بانورامية",
                "• مسبح لا متناهي",
                "• منزل ذكي بالكامل",
                "• مجلس بارتفاع مضاعف",
                "• غرف للخدم"
            ],
            "amenities": [
                "مسبح", "صالة رياضية", "ساونا", "موقف مغطى", "كونسيرج",
                "ملعب أطفال", "منطقة شواء", "أقفال ذكية", "مخزن", "حديقة"
            ],
            "priceLabel": "السعر",
            "addressLabel": "العنوان",
            "cityLabel": "المدينة",
            "stateLabel": "الولاية",
            "zipCodeLabel": "الرمز البريدي",
            "amenitiesLabel": "المرافق والميزات",
            "agentLabel": "اتصل بوكيلك",
            "propertyDescriptionLabel": "وصف العقار",
            "keyHighlightsLabel": "المميزات الرئيسية",
            "propertyGalleryLabel": "معرض العقار"
        }
    }))
    .unwrap()
}

fn page_count_marker(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}

#[test]
fn english_brochure_is_four_numbered_pages() {
    let base = serve_png(png_fixture(1200, 800), 3);
    let urls = (0..3).map(|i| format!("{}/photo{}.png", base, i)).collect();
    let property = full_property(urls);

    let bytes = renderer().render(&property, Language::English).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let text = page_count_marker(&bytes);
    assert!(text.contains("/Count 4"));
    assert!(text.contains("(Dollar 550,000) Tj"));
    assert!(text.contains("(123 Main St, Springfield, 12345) Tj"));

    // Footer numbers appear in page order
    let positions: Vec<usize> = (1..=4)
        .map(|n| text.find(&format!("({}) Tj", n)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn arabic_brochure_is_four_pages() {
    let base = serve_png(png_fixture(800, 600), 3);
    let urls = (0..3).map(|i| format!("{}/photo{}.png", base, i)).collect();
    let property = full_property(urls);

    let bytes = renderer().render(&property, Language::Arabic).unwrap();
    assert!(!bytes.is_empty());
    let text = page_count_marker(&bytes);
    assert!(text.contains("/Count 4"));
    // Price formatting is shared across variants
    assert!(text.contains("(Dollar 550,000) Tj"));
}

#[test]
fn combined_brochure_inserts_interstitial_page() {
    let property = full_property(vec![]);
    let bytes = renderer().render_combined(&property).unwrap();
    let text = page_count_marker(&bytes);
    assert!(text.contains("/Count 5"));
    let positions: Vec<usize> = (1..=5)
        .map(|n| text.find(&format!("({}) Tj", n)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn zero_images_degrades_to_placeholder() {
    let property = full_property(vec![]);
    let bytes = renderer().render(&property, Language::English).unwrap();
    let text = page_count_marker(&bytes);
    assert!(text.contains("/Count 4"));
    assert!(text.contains("(Image not available"));
    // No image XObjects were embedded
    assert!(!text.contains("/Subtype /Image"));
}

#[test]
fn fetched_images_are_embedded_as_xobjects() {
    let base = serve_png(png_fixture(640, 480), 3);
    let urls = (0..3).map(|i| format!("{}/photo{}.png", base, i)).collect();
    let property = full_property(urls);

    let bytes = renderer().render(&property, Language::English).unwrap();
    let text = page_count_marker(&bytes);
    assert!(text.contains("/Subtype /Image"));
    assert!(text.contains("/Width 640"));
    assert!(text.contains("/Height 480"));
    assert!(!text.contains("(Image not available"));
}

#[test]
fn unreachable_image_host_still_produces_full_document() {
    // Port 1 refuses connections immediately
    let urls = (0..5)
        .map(|i| format!("http://127.0.0.1:1/photo{}.png", i))
        .collect();
    let property = full_property(urls);

    let bytes = renderer().render(&property, Language::English).unwrap();
    let text = page_count_marker(&bytes);
    assert!(text.contains("/Count 4"));
    assert!(text.contains("(Image not available"));
}

#[test]
fn malformed_localized_content_falls_back_to_legacy() {
    let mut value = json!({
        "title": "Fallback Home",
        "description": "Base description.",
        "price": 999.0,
        "currency": "Dollar",
        "aiContent": {
            "englishDescription": "Legacy english description.",
            "arabicDescription": "وصف قديم للعقار",
            "keyHighlights": ["• Quiet street"]
        }
    });
    // Missing required label fields: strict parse treats the object as absent
    value["englishContent"] = json!({"title": "partial", "description": "partial"});
    let property: PropertyRecord = serde_json::from_value(value).unwrap();

    let bytes = renderer().render(&property, Language::English).unwrap();
    let text = page_count_marker(&bytes);
    assert!(text.contains("/Count 4"));
    assert!(text.contains("(Legacy english description.) Tj"));
    assert!(text.contains("(Dollar 999) Tj"));
    // Default label table applied
    assert!(text.contains("(Property Description) Tj"));
}
