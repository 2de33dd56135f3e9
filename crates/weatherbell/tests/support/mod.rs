#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Mutex;

use arkstorm_common::error::ArkstormResult;
use arkstorm_weatherbell::{HttpResponse, ProviderTransport};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// Cycle used by the provider fixtures: 2023-02-03 18:00 UTC.
pub const CYCLE: i64 = 1_675_447_200;

/// 91 hourly frame names starting at `CYCLE`, as returned by the provider.
pub const FRAME_LIST: &str = r#"["1675447200-6BSj9Y0w2Ao","1675450800-GWr3z89zNEI","1675454400-mHFUY0aM3Yo","1675458000-vQq3LAkHT0s","1675461600-qVs2eyClgvk","1675465200-DyQjhuaUrj8","1675468800-Y8yMO8NgP1o","1675472400-gahM0WGU5rA","1675476000-iwu6QO63hZc","1675479600-t2OrMHWuUrY","1675483200-XnVidmm2fJg","1675486800-ECr9zKUHSkQ","1675490400-EviQq3ByYkY","1675494000-TLZaaeqfoYM","1675497600-8I9EM56y5I4","1675501200-C0G8ZTzhr88","1675504800-reB7Bo9goZg","1675508400-79tbmtSHrhU","1675512000-uJyDi9Lh5Z4","1675515600-TiauRttwMCw","1675519200-KibQy45jI2M","1675522800-Ba14KZIum8M","1675526400-6k7iFg4XffI","1675530000-5LpKJ5p8hPM","1675533600-hdZeksxlaFU","1675537200-tBTafzZLEl8","1675540800-SQOt43Stn30","1675544400-uMjputS7N04","1675548000-4M9kk4hYigo","1675551600-qXmCfgjCbgA","1675555200-cgOrQLVFkCY","1675558800-TmMxK0zC4kg","1675562400-SoqtrfVl02U","1675566000-dD4gdP6GUXE","1675569600-diAbjSRdt00","1675573200-anC7XPPOeNE","1675576800-4YnUCTjJNnc","1675580400-7tJ9sUTLuVc","1675584000-eObbCFhPmBY","1675587600-B8mk6l0zWYE","1675591200-BbaHQUzoc7w","1675594800-gPqcs5gTyQc","1675598400-NZrPTiPmrVU","1675602000-cUYmgxPjpq0","1675605600-YiEHGxJg43M","1675609200-uHCM9YIhJTI","1675612800-nCVN29uZs1Q","1675616400-ohoVBLURasc","1675620000-scsHzkupERs","1675623600-bOb7O9htFEs","1675627200-P5dS3Z0dyZA","1675630800-GFcSVBvXovw","1675634400-hXjY0FHApKQ","1675638000-Bb9e79UrQYg","1675641600-780fbdL98eM","1675645200-nEXjSKWuG8M","1675648800-dNMRVx9vR3Q","1675652400-R1nE8d126r8","1675656000-Q3ayGzBsBt8","1675659600-1iInldKzRUU","1675663200-kb4yq32aCZk","1675666800-miEtelm7pog","1675670400-NVVMiiBEAWM","1675674000-XupejHmUCFE","1675677600-DryP6XOW0OE","1675681200-YgY2w4xQcl0","1675684800-tAlXqxd50Wo","1675688400-fnn2KjKnhEA","1675692000-iSXGq2dg1ss","1675695600-djVJopaDQT4","1675699200-cGiL5g7ncuE","1675702800-d92jIWebqk8","1675706400-DzNCNa1ET2E","1675710000-YYu5XVBadzo","1675713600-RHI9pTxrFdw","1675717200-zZeUtVLhZGY","1675720800-olIEBnr0KdI","1675724400-yQHQA3KyCio","1675728000-mBPe3iUE1LQ","1675731600-mn8smH17G0g","1675735200-H5GyBkmW3zs","1675738800-ihDP4sSOXxc","1675742400-Qqe7JGCEowE","1675746000-htRiKIwVEG8","1675749600-7BGW6QjRe3s","1675753200-DnhWWqESbEM","1675756800-OGMLiTfI85o","1675760400-oIgR4q5PyAM","1675764000-tZ07IhbuZc8","1675767600-Sg8NpTGCQ5E","1675771200-H8tR1BPddtY"]"#;

pub fn frame_names() -> Vec<String> {
    serde_json::from_str(FRAME_LIST).expect("fixture frame list should parse")
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

type Handler = Box<dyn Fn(&RecordedRequest) -> ArkstormResult<HttpResponse> + Send + Sync>;

/// In-memory transport that answers every request with `handler`.
pub struct FakeTransport {
    handler: Handler,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new(
        handler: impl Fn(&RecordedRequest) -> ArkstormResult<HttpResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn handle(&self, request: RecordedRequest) -> ArkstormResult<HttpResponse> {
        let response = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

#[async_trait::async_trait]
impl ProviderTransport for FakeTransport {
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: Vec<(String, String)>,
    ) -> ArkstormResult<HttpResponse> {
        self.handle(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            body: String::from_utf8_lossy(&body).into_owned(),
            headers,
        })
    }

    async fn get(&self, url: &str) -> ArkstormResult<HttpResponse> {
        self.handle(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            body: String::new(),
            headers: vec![],
        })
    }
}

pub fn ok(body: impl Into<Vec<u8>>) -> ArkstormResult<HttpResponse> {
    Ok(HttpResponse {
        status: 200,
        set_cookies: vec![],
        body: body.into(),
    })
}

/// A small gradient image encoded as PNG.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90, 255])
    });
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("encode sample png");
    out
}
