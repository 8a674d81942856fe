use anyhow::Result;
use log::info;
use r2sign::r2::PutObjectOptions;
use std::env;

/// Upload a local file, read it back and optionally delete it.
///
/// ```shell
/// cargo run --example upload -- ./model.pdb jobs/42/model.pdb
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(path), Some(key)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: upload <path> <key> [--delete]");
    };
    let delete = args.next().as_deref() == Some("--delete");

    let client = r2sign::default_client()?;

    let out = client
        .put_file(&path, &key, PutObjectOptions::default())
        .await?;
    info!("uploaded {path} as {}", out.key);
    println!("{}", out.url);

    let content = client.get(&key).await?;
    info!("read back {} bytes", content.len());

    if delete {
        client.delete(&key).await?;
        info!("deleted {key}");
    }

    Ok(())
}
