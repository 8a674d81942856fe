// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in signed requests.
pub const HOST: &str = "host";
pub const CONTENT_TYPE: &str = "content-type";
pub const CACHE_CONTROL: &str = "cache-control";
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const AUTHORIZATION: &str = "Authorization";

// Env values used to resolve the storage config.
pub const R2_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
pub const R2_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
pub const R2_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
pub const R2_BUCKET_NAME: &str = "R2_BUCKET_NAME";
pub const R2_PUBLIC_BASE_URL: &str = "R2_PUBLIC_BASE_URL";
pub const R2_CDN_BASE_URL: &str = "R2_CDN_BASE_URL";

// Signing scope.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const REGION: &str = "auto";
pub const SERVICE: &str = "s3";
pub const SCOPE_TERMINATOR: &str = "aws4_request";

pub const HOST_SUFFIX: &str = "r2.cloudflarestorage.com";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - Applied per key segment, so '/' never reaches it.
pub static KEY_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
