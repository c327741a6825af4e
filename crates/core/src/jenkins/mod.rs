// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins vocabulary: request building and response translation

mod model;
mod multipart;
mod request;

pub use model::{
    parse_build, parse_build_listing, parse_crumb, parse_job_listing, parse_queue_item,
    parse_queue_location, parse_test_listing, parse_test_names, parse_test_report, Crumb, Executable, RemoteBuild,
    RemoteJob, RemoteQueueItem, RemoteTestListing, TestOutcome, TestStatus,
};
pub use multipart::Multipart;
pub use request::{
    HttpMethod, HttpRequest, HttpResponse, RequestBody, RequestFactory, EXTERNAL_JOB_ID_PARAM,
};
