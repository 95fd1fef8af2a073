use super::store::{BillStore, ReceiptFile, StoreError};
use crate::shared::api_utils::{api_base, join_url};
use async_trait::async_trait;
use contracts::domain::a001_bill::aggregate::{
    Bill, NewBillPayload, UpdateBillRequest, UploadedReceipt,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

/// Bill store backed by the HTTP API
#[derive(Debug, Clone)]
pub struct HttpBillStore {
    base: String,
}

impl HttpBillStore {
    pub fn new() -> Self {
        Self { base: api_base() }
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base, path)
    }
}

impl Default for HttpBillStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl BillStore for HttpBillStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let response = Request::get(&self.url("/bills"))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Failed to send request: {}", e)))?;
        read_json(response).await
    }

    async fn create(&self, bill: &NewBillPayload) -> Result<Bill, StoreError> {
        let response = Request::post(&self.url("/bills"))
            .json(bill)
            .map_err(|e| StoreError::new(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Failed to send request: {}", e)))?;
        read_json(response).await
    }

    async fn update(&self, request: &UpdateBillRequest) -> Result<Bill, StoreError> {
        let path = format!("/bills/{}", urlencoding::encode(&request.selector));
        let response = Request::patch(&self.url(&path))
            .json(request)
            .map_err(|e| StoreError::new(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Failed to send request: {}", e)))?;
        read_json(response).await
    }

    async fn upload(&self, file: &ReceiptFile, email: &str) -> Result<UploadedReceipt, StoreError> {
        use web_sys::{Blob, BlobPropertyBag, FormData};

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));
        let options = BlobPropertyBag::new();
        options.set_type(&file.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_error)?;

        let form_data = FormData::new().map_err(js_error)?;
        form_data
            .append_with_blob_and_filename("file", &blob, file.base_name())
            .map_err(js_error)?;
        form_data.append_with_str("email", email).map_err(js_error)?;

        let response = Request::post(&self.url("/bills/receipt"))
            .body(form_data)
            .map_err(|e| StoreError::new(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| StoreError::new(format!("Failed to send request: {}", e)))?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    if !response.ok() {
        return Err(StoreError::http(response.status()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::new(format!("Failed to parse response: {}", e)))
}

fn js_error(e: JsValue) -> StoreError {
    StoreError::new(format!("{e:?}"))
}
